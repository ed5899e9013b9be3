//! File locations and bundled files.
use std::path::PathBuf;

const APP_DIR: &str = "confab";

/// Config written on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../data/config.yml");

/// Resolve `<base>/confab`. An unset or empty XDG variable falls back to the
/// platform directory, then to `fallback` under the home directory.
fn app_dir(xdg_var: &str, platform_dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    std::env::var_os(xdg_var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(platform_dir)
        .or_else(|| dirs::home_dir().map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
        .join(APP_DIR)
}

/// Directory holding `confab.yml`.
pub fn get_config_dir() -> PathBuf {
    app_dir("XDG_CONFIG_HOME", dirs::config_dir(), ".config")
}

/// Directory for logs, created if missing.
pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = app_dir("XDG_DATA_HOME", dirs::data_local_dir(), ".local/share");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Serializes tests that modify the environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_get_config_dir_with_xdg_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let tmp_dir = tempfile::tempdir().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp_dir.path());
        }

        assert_eq!(get_config_dir(), tmp_dir.path().join("confab"));

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    fn test_get_config_dir_empty_xdg_is_unset() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "");
        }

        let config_dir = get_config_dir();
        assert!(config_dir.is_absolute() || dirs::home_dir().is_none());
        assert!(config_dir.ends_with("confab"));
        if let Some(platform) = dirs::config_dir() {
            assert_eq!(config_dir, platform.join("confab"));
        }

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    fn test_get_data_dir_with_xdg_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let tmp_dir = tempfile::tempdir().unwrap();
        let xdg_data_path = tmp_dir.path().join("nested");
        unsafe {
            env::set_var("XDG_DATA_HOME", &xdg_data_path);
        }

        let data_dir = get_data_dir().unwrap();
        assert_eq!(data_dir, xdg_data_path.join("confab"));
        assert!(data_dir.is_dir());

        unsafe {
            env::remove_var("XDG_DATA_HOME");
        }
    }

    #[test]
    fn test_default_config() {
        assert!(DEFAULT_CONFIG.contains("model:"));
        assert!(DEFAULT_CONFIG.contains("env:TOGETHER_API_KEY"));
        assert!(DEFAULT_CONFIG.contains("history_window:"));
    }
}
