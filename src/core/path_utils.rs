/*
 * Shared helper for locating the per-user configuration directory. Kept in
 * one place so every persistence concern resolves the same location.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Returns the application's local (non-roaming) configuration directory,
 * creating it if it does not exist yet. `None` means no suitable location
 * could be determined or created; callers treat that as "no persistence
 * available" rather than an error.
 */
pub fn app_config_dir(app_name: &str) -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", app_name)?;
    let config_dir = project_dirs.config_local_dir();
    if !config_dir.exists() {
        if let Err(e) = fs::create_dir_all(config_dir) {
            log::error!("PathUtils: Failed to create config directory {config_dir:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config directory {config_dir:?}");
    }
    Some(config_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ProjectDirs resolution is environment-dependent; this only checks that
    // a resolvable directory actually exists afterwards.
    #[test]
    fn test_app_config_dir_exists_when_resolved() {
        if let Some(dir) = app_config_dir("PeInspectPathUtilsTest") {
            assert!(dir.exists());
            let _ = fs::remove_dir_all(&dir);
        }
    }
}
