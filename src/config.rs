use std::path::PathBuf;

/// Environment variable naming the SteamAPI shared library to load.
pub const ENV_LIBRARY: &str = "STEAMVR_API_LIB";
/// Environment variable that turns a missing export into a load error.
pub const ENV_STRICT_SYMBOLS: &str = "STEAMVR_STRICT_SYMBOLS";

/// Settings for locating and resolving the native library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Path or bare file name handed to the platform loader.
    pub library_path: PathBuf,
    /// Fail the load if any entry point is missing instead of leaving the
    /// slot unbound.
    pub strict_symbols: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from(default_library_name()),
            strict_symbols: false,
        }
    }
}

impl LoaderConfig {
    /// Build a config from `STEAMVR_API_LIB` and `STEAMVR_STRICT_SYMBOLS`,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            library_path: PathBuf::from(read_env_string(
                ENV_LIBRARY,
                &defaults.library_path.to_string_lossy(),
            )),
            strict_symbols: read_env_bool(ENV_STRICT_SYMBOLS, defaults.strict_symbols),
        }
    }
}

/// Platform file name of the SteamAPI library.
pub fn default_library_name() -> String {
    if cfg!(all(target_os = "windows", target_pointer_width = "64")) {
        "steam_api64.dll".to_string()
    } else {
        libloading::library_filename("steam_api")
            .to_string_lossy()
            .into_owned()
    }
}

fn read_env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => parse_bool(&v).unwrap_or_else(|| {
            log::warn!("Ignoring {}='{}', expected a boolean", name, v);
            default
        }),
        Err(_) => default,
    }
}

fn read_env_string(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_default_library_name() {
        let name = default_library_name();
        assert!(name.contains("steam_api"));
        if cfg!(target_os = "linux") {
            assert_eq!(name, "libsteam_api.so");
        }
    }

    #[test]
    fn test_unset_env_falls_back_to_default() {
        assert_eq!(read_env_string("STEAMVR_TEST_UNSET_VARIABLE", "x"), "x");
        assert!(read_env_bool("STEAMVR_TEST_UNSET_VARIABLE", true));
    }
}
