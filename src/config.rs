//! Loader configuration from environment variables.
//!
//! All values come from `GLL_*` environment variables with defaults. Invalid
//! values fall back to defaults without failing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `GLL_GL_LIBRARY` | unset | GL library to open instead of the platform default |
//! | `GLL_SYSTEM_FALLBACK` | true | Windows: resolve from `opengl32.dll` exports when WGL fails |
//! | `GLL_LOG_LEVEL` | info | Log filter directive |
//! | `GLL_LOG_FORMAT` | json | `json` or `pretty` |

use std::path::PathBuf;

use crate::telemetry::{LogConfig, LogFormat};

/// Summary of the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub gl_library: Option<String>,
    pub system_fallback: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// GL library path or name overriding the platform default
    /// (`libGL.so.1` on Unix, `opengl32.dll` on Windows).
    pub gl_library: Option<PathBuf>,
    /// Windows only: fall back to the system library's exports.
    pub system_fallback: bool,
    pub log: LogConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            gl_library: None,
            system_fallback: true,
            log: LogConfig::default(),
        }
    }
}

/// Parse a boolean env var, returning `default` on missing or invalid.
fn parse_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Non-empty env var value.
fn parse_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn load_log_config() -> LogConfig {
    let defaults = LogConfig::default();
    let level = parse_string("GLL_LOG_LEVEL").unwrap_or(defaults.level);
    let format = parse_string("GLL_LOG_FORMAT")
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or(defaults.format);
    LogConfig {
        format,
        level,
        output_path: None,
    }
}

/// Load configuration from environment variables.
pub fn load() -> LoaderConfig {
    LoaderConfig {
        gl_library: parse_string("GLL_GL_LIBRARY").map(PathBuf::from),
        system_fallback: parse_bool("GLL_SYSTEM_FALLBACK", true),
        log: load_log_config(),
    }
}

impl LoaderConfig {
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            gl_library: self
                .gl_library
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            system_fallback: self.system_fallback,
            log_level: self.log.level.clone(),
            log_format: self.log.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests to avoid cross-test pollution.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "GLL_GL_LIBRARY",
        "GLL_SYSTEM_FALLBACK",
        "GLL_LOG_LEVEL",
        "GLL_LOG_FORMAT",
    ];

    fn clear_env_vars() {
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn test_defaults_are_sensible() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        let cfg = load();
        assert!(cfg.gl_library.is_none());
        assert!(cfg.system_fallback);
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn test_env_vars_override_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var("GLL_GL_LIBRARY", "/opt/mesa/libGL.so.1");
        std::env::set_var("GLL_SYSTEM_FALLBACK", "off");
        std::env::set_var("GLL_LOG_LEVEL", "gll=trace");
        std::env::set_var("GLL_LOG_FORMAT", "pretty");
        let cfg = load();
        assert_eq!(cfg.gl_library, Some(PathBuf::from("/opt/mesa/libGL.so.1")));
        assert!(!cfg.system_fallback);
        assert_eq!(cfg.log.level, "gll=trace");
        assert_eq!(cfg.log.format, LogFormat::Pretty);
        clear_env_vars();
    }

    #[test]
    fn test_invalid_env_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var("GLL_SYSTEM_FALLBACK", "maybe");
        std::env::set_var("GLL_LOG_FORMAT", "xml");
        std::env::set_var("GLL_GL_LIBRARY", "   ");
        let cfg = load();
        assert!(cfg.system_fallback);
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert!(cfg.gl_library.is_none());
        clear_env_vars();
    }

    #[test]
    fn test_effective_config_mirrors_values() {
        let cfg = LoaderConfig {
            gl_library: Some(PathBuf::from("libGL.so")),
            ..Default::default()
        };
        let eff = cfg.effective_config();
        assert_eq!(eff.gl_library.as_deref(), Some("libGL.so"));
        assert!(eff.system_fallback);
        assert_eq!(eff.log_level, "info");
    }
}
