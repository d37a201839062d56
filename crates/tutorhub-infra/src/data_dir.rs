//! Location of the TutorHub data directory.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "TUTORHUB_DATA_DIR";

/// Resolve the data directory.
///
/// Priority: `TUTORHUB_DATA_DIR`, then `~/.tutorhub`, then `./.tutorhub`
/// when no home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".tutorhub"))
        .unwrap_or_else(|| PathBuf::from(".tutorhub"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_ends_with_tutorhub_or_override() {
        let dir = resolve_data_dir();
        match std::env::var(DATA_DIR_ENV) {
            Ok(value) if !value.trim().is_empty() => assert_eq!(dir, PathBuf::from(value)),
            _ => assert!(dir.ends_with(".tutorhub")),
        }
    }
}
