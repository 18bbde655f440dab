//! # Paths
//!
//! Centralized definitions for where configuration and logs live on disk.

use std::path::PathBuf;

pub const DATA_DIR: &str = "data";
pub const CONFIG_FILE: &str = "config.yaml";
pub const SESSION_LOG_FILE: &str = "session.log";
pub const APP_DIR: &str = "blockmind";

/// Returns the working-directory config path (e.g. "data/config.yaml")
pub fn local_config() -> PathBuf {
    PathBuf::from(DATA_DIR).join(CONFIG_FILE)
}

/// Returns the per-user config path (e.g. "~/.config/blockmind/config.yaml"), if the platform has one
pub fn user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Candidate config locations in lookup order.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![local_config()];
    candidates.extend(user_config());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_comes_first() {
        let candidates = config_candidates();
        assert_eq!(candidates[0], PathBuf::from("data/config.yaml"));
        if let Some(user) = user_config() {
            assert!(user.ends_with("blockmind/config.yaml"));
        }
    }
}
