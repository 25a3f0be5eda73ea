use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::modules::walk::Position;

/// Read-only projection of one finished tick, for whoever draws the pasture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 1-based; 0 means no tick has run yet.
    pub iteration: u64,
    pub sheep: Vec<Position>,
    pub wolves: Vec<Position>,
    pub sheep_count: usize,
    pub wolf_count: usize,
    pub grid: Vec<Vec<f64>>,
}

impl Snapshot {
    pub fn legend(&self) -> String {
        format!(
            "Iteration {} | Sheep: {} | Wolves: {}",
            self.iteration, self.sheep_count, self.wolf_count
        )
    }

    pub fn total_resource(&self) -> f64 {
        self.grid.iter().flatten().sum()
    }

    pub fn grid_dimensions(&self) -> (usize, usize) {
        let height = self.grid.len();
        let width = self.grid.first().map(Vec::len).unwrap_or(0);
        (width, height)
    }
}

pub fn pasture_dir() -> PathBuf {
    PathBuf::from(".pasture")
}

pub fn snapshot_file_path() -> PathBuf {
    snapshot_path_in(&pasture_dir())
}

fn snapshot_path_in(dir: &Path) -> PathBuf {
    dir.join("snapshot.json")
}

/// Overwrite the latest snapshot; earlier ticks are not kept.
pub fn save_snapshot(snapshot: &Snapshot) -> io::Result<PathBuf> {
    save_snapshot_in(&pasture_dir(), snapshot)
}

pub fn save_snapshot_in(dir: &Path, snapshot: &Snapshot) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = snapshot_path_in(dir);
    let json = serde_json::to_vec(snapshot)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn load_snapshot() -> io::Result<Option<Snapshot>> {
    load_snapshot_in(&pasture_dir())
}

pub fn load_snapshot_in(dir: &Path) -> io::Result<Option<Snapshot>> {
    let path = snapshot_path_in(dir);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "failed to parse snapshot {}; rerun `pasture run` to regenerate it: {}",
                path.display(),
                e
            ),
        )
    })?;
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            iteration: 3,
            sheep: vec![Position::new(1, 2)],
            wolves: vec![Position::new(3, 4), Position::new(5, 6)],
            sheep_count: 1,
            wolf_count: 2,
            grid: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        }
    }

    #[test]
    fn legend_names_counts_and_iteration() {
        assert_eq!(sample().legend(), "Iteration 3 | Sheep: 1 | Wolves: 2");
    }

    #[test]
    fn grid_summaries() {
        let snapshot = sample();
        assert_eq!(snapshot.grid_dimensions(), (3, 2));
        assert_eq!(snapshot.total_resource(), 21.0);
    }

    #[test]
    fn latest_snapshot_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_snapshot_in(dir.path()).unwrap().is_none());

        save_snapshot_in(dir.path(), &sample()).unwrap();
        let mut next = sample();
        next.iteration = 4;
        save_snapshot_in(dir.path(), &next).unwrap();

        let loaded = load_snapshot_in(dir.path()).unwrap().unwrap();
        assert_eq!(loaded, next);
    }
}
