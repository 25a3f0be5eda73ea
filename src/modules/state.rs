use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::modules::view::pasture_dir;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Initialized,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeState {
    pub status: Status,
    pub last_tick: u64,
    pub message: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self {
            status: Status::Initialized,
            last_tick: 0,
            message: None,
            updated_at: None,
        }
    }
}

fn state_path_in(dir: &Path) -> PathBuf {
    dir.join("state.json")
}

pub fn state_file_path() -> PathBuf {
    state_path_in(&pasture_dir())
}

pub fn load_state() -> io::Result<Option<RuntimeState>> {
    load_state_in(&pasture_dir())
}

pub fn load_state_in(dir: &Path) -> io::Result<Option<RuntimeState>> {
    let path = state_path_in(dir);
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(&path)?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let state: RuntimeState = serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "failed to parse state file {}; delete it to reset: {}",
                path.display(),
                e
            ),
        )
    })?;
    Ok(Some(state))
}

pub fn save_state_in(dir: &Path, state: &RuntimeState) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_vec_pretty(state)?;
    fs::write(state_path_in(dir), json)?;
    Ok(())
}

pub fn set_status(
    status: Status,
    last_tick: u64,
    message: Option<String>,
) -> io::Result<RuntimeState> {
    set_status_in(&pasture_dir(), status, last_tick, message)
}

pub fn set_status_in(
    dir: &Path,
    status: Status,
    last_tick: u64,
    message: Option<String>,
) -> io::Result<RuntimeState> {
    let mut state = load_state_in(dir)?.unwrap_or_default();
    state.status = status;
    state.last_tick = last_tick;
    state.message = message;
    state.updated_at = Some(Utc::now().to_rfc3339());
    save_state_in(dir, &state)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_the_state_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_state_in(dir.path()).unwrap().is_none());

        set_status_in(dir.path(), Status::Running, 3, Some("grazing".into())).unwrap();
        let state = set_status_in(dir.path(), Status::Completed, 50, None).unwrap();
        assert_eq!(state.status, Status::Completed);

        let loaded = load_state_in(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.status, Status::Completed);
        assert_eq!(loaded.last_tick, 50);
        assert!(loaded.message.is_none());
        assert!(loaded.updated_at.is_some());
    }

    #[test]
    fn corrupt_state_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path_in(dir.path()), b"{not json").unwrap();
        let err = load_state_in(dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn state_file_lives_beside_the_snapshot() {
        let path = state_file_path();
        assert_eq!(path.parent(), Some(pasture_dir().as_path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("state.json"));
    }
}
