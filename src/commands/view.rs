use pasture::{Position, Snapshot, load_snapshot, snapshot_file_path, state};

pub(super) fn run_status() -> Result<(), String> {
    match state::load_state().map_err(|e| e.to_string())? {
        Some(state) => {
            println!("Status: {:?} | last tick: {}", state.status, state.last_tick);
            if let Some(message) = state.message {
                println!("Message: {}", message);
            }
            if let Some(updated_at) = state.updated_at {
                println!("Updated at: {}", updated_at);
            }
            println!("State file at {}", state::state_file_path().display());
        }
        None => println!("No run recorded yet. Use `pasture run` to start one."),
    }
    Ok(())
}

pub(super) fn run_view(json: bool) -> Result<(), String> {
    let Some(snapshot) = load_snapshot().map_err(|e| e.to_string())? else {
        println!("No snapshot yet. Use `pasture run` to produce one.");
        return Ok(());
    };

    print_summary(&snapshot);
    println!(
        "Snapshot file at {} (pass --json to print it here)",
        snapshot_file_path().display()
    );

    if json {
        let json_str = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
        println!("{}", json_str);
    }
    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    let (width, height) = snapshot.grid_dimensions();
    println!("{}", snapshot.legend());
    println!(
        "Grid: {}x{} | resource remaining: {:.1}",
        width,
        height,
        snapshot.total_resource()
    );
    if let Some(centre) = centroid(&snapshot.sheep) {
        println!("Flock centre: ({:.1}, {:.1})", centre.0, centre.1);
    }
    if let Some(centre) = centroid(&snapshot.wolves) {
        println!("Pack centre: ({:.1}, {:.1})", centre.0, centre.1);
    }
}

fn centroid(positions: &[Position]) -> Option<(f64, f64)> {
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as f64;
    let (sx, sy) = positions.iter().fold((0.0, 0.0), |(sx, sy), p| {
        (sx + f64::from(p.x), sy + f64::from(p.y))
    });
    Some((sx / n, sy / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_nothing_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_averages_positions() {
        let centre = centroid(&[Position::new(0, 0), Position::new(10, 4)]).unwrap();
        assert_eq!(centre, (5.0, 2.0));
    }
}
