/*
 * Persists the recently-opened-files list across process restarts. The list
 * is stored as a JSON string array in the per-user configuration directory;
 * the encoding is deliberately trivial because "ordered list of strings
 * survives restart" is the whole contract.
 *
 * A trait (`ConfigManagerOperations`) abstracts the storage so session tests
 * can run against an in-memory mock; `CoreConfigManager` is the file-backed
 * implementation.
 */
use crate::core::path_utils;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

const RECENT_FILES_FILENAME: &str = "recent_files.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration encoding error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoConfigDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_recent_files(&self, app_name: &str) -> Result<Option<Vec<String>>>;
    fn save_recent_files(&self, app_name: &str, entries: &[String]) -> Result<()>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }

    fn recent_files_path(app_name: &str) -> Result<PathBuf> {
        let config_dir =
            path_utils::app_config_dir(app_name).ok_or(ConfigError::NoConfigDirectory)?;
        Ok(config_dir.join(RECENT_FILES_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    // A missing file is the normal first-run case, not an error.
    fn load_recent_files(&self, app_name: &str) -> Result<Option<Vec<String>>> {
        let file_path = Self::recent_files_path(app_name)?;
        if !file_path.exists() {
            log::debug!("CoreConfigManager: No recent files stored at {file_path:?}.");
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&file_path)?);
        let entries: Vec<String> = serde_json::from_reader(reader)?;
        log::debug!(
            "CoreConfigManager: Loaded {} recent file entries from {file_path:?}.",
            entries.len()
        );
        Ok(Some(entries))
    }

    fn save_recent_files(&self, app_name: &str, entries: &[String]) -> Result<()> {
        let file_path = Self::recent_files_path(app_name)?;
        let writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(writer, entries)?;
        log::debug!(
            "CoreConfigManager: Saved {} recent file entries to {file_path:?}.",
            entries.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    // File-backed manager pinned to a temp directory instead of the real
    // per-user location.
    struct TestConfigManager {
        config_dir: PathBuf,
    }

    impl TestConfigManager {
        fn new(config_dir: &Path) -> Self {
            fs::create_dir_all(config_dir).expect("Failed to create test config dir");
            TestConfigManager {
                config_dir: config_dir.to_path_buf(),
            }
        }

        fn file_path(&self) -> PathBuf {
            self.config_dir.join(RECENT_FILES_FILENAME)
        }
    }

    impl ConfigManagerOperations for TestConfigManager {
        fn load_recent_files(&self, _app_name: &str) -> Result<Option<Vec<String>>> {
            let file_path = self.file_path();
            if !file_path.exists() {
                return Ok(None);
            }
            let reader = BufReader::new(File::open(file_path)?);
            Ok(Some(serde_json::from_reader(reader)?))
        }

        fn save_recent_files(&self, _app_name: &str, entries: &[String]) -> Result<()> {
            let writer = BufWriter::new(File::create(self.file_path())?);
            serde_json::to_writer_pretty(writer, entries)?;
            Ok(())
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path());
        let entries = vec![
            "/tmp/a.exe".to_string(),
            "/tmp/b.dll".to_string(),
        ];

        manager.save_recent_files("AnyApp", &entries).unwrap();
        let loaded = manager.load_recent_files("AnyApp").unwrap();

        assert_eq!(loaded, Some(entries));
    }

    #[test]
    fn test_load_without_stored_file_is_none() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path());
        assert!(manager.load_recent_files("AnyApp").unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_file_is_serde_error() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path());
        fs::write(manager.file_path(), b"not json {").unwrap();

        match manager.load_recent_files("AnyApp") {
            Err(ConfigError::Serde(_)) => {}
            other => panic!("Expected Serde error for malformed file, got {other:?}"),
        }
    }

    #[test]
    fn test_save_overwrites_previous_list() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path());

        manager
            .save_recent_files("AnyApp", &["/tmp/old.exe".to_string()])
            .unwrap();
        manager
            .save_recent_files("AnyApp", &["/tmp/new.exe".to_string()])
            .unwrap();

        assert_eq!(
            manager.load_recent_files("AnyApp").unwrap(),
            Some(vec!["/tmp/new.exe".to_string()])
        );
    }

    #[test]
    fn test_core_config_manager_round_trip_in_real_config_dir() {
        // Uses the real per-user location; unique app name keeps runs isolated.
        let app_name = format!("PeInspectConfigTest_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();
        let entries = vec!["/tmp/real.exe".to_string()];

        manager.save_recent_files(&app_name, &entries).unwrap();
        let loaded = manager.load_recent_files(&app_name).unwrap();
        assert_eq!(loaded, Some(entries));

        if let Some(dir) = path_utils::app_config_dir(&app_name) {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
