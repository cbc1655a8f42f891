//! Configuración del motor desde variables de entorno (y `.env`).

use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::ConfigurationError;

// .env se lee una sola vez por proceso.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // sin .env vale el entorno del proceso
});

pub const WORKING_DIR_VAR: &str = "SEQFLOW_WORKING_DIR";
pub const LOCAL_THREADS_VAR: &str = "SEQFLOW_LOCAL_THREADS";
pub const STRICT_PARAMETERS_VAR: &str = "SEQFLOW_STRICT_PARAMETERS";
pub const REMOTE_TIMEOUT_VAR: &str = "SEQFLOW_REMOTE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directorio donde todos los steps escriben y buscan sus datos.
    pub working_directory: PathBuf,
    pub local_threads: usize,
    /// Los parámetros obsoletos pasan de aviso a error.
    pub strict_parameters: bool,
    pub remote_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { working_directory: PathBuf::from("."),
               local_threads: default_threads(),
               strict_parameters: false,
               remote_timeout: None }
    }
}

fn default_threads() -> usize { std::thread::available_parallelism().map(usize::from).unwrap_or(1) }

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        // carga .env antes de leer las variables
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Igual que `from_env` pero leyendo de `lookup`; los tests lo usan para
    /// no depender del entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let bad = |name: &str, message: String| ConfigurationError::Env { name: name.to_string(), message };

        let working_directory = read(WORKING_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.working_directory);
        let local_threads = match read(LOCAL_THREADS_VAR) {
            Some(v) => match v.parse::<usize>() {
                Ok(0) => return Err(bad(LOCAL_THREADS_VAR, "must be at least 1".into())),
                Ok(n) => n,
                Err(e) => return Err(bad(LOCAL_THREADS_VAR, format!("{v:?}: {e}"))),
            },
            None => defaults.local_threads,
        };
        let strict_parameters = match read(STRICT_PARAMETERS_VAR).map(|v| v.to_lowercase()) {
            None => false,
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => true,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no") => false,
            Some(v) => return Err(bad(STRICT_PARAMETERS_VAR, format!("{v:?} is not a boolean"))),
        };
        let remote_timeout = match read(REMOTE_TIMEOUT_VAR) {
            Some(v) => Some(Duration::from_secs(v.parse::<u64>().map_err(|e| bad(REMOTE_TIMEOUT_VAR, format!("{v:?}: {e}")))?)),
            None => None,
        };
        Ok(Self { working_directory, local_threads, strict_parameters, remote_timeout })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<EngineConfig, ConfigurationError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        EngineConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.working_directory, PathBuf::from("."));
        assert!(!cfg.strict_parameters);
        assert!(cfg.local_threads >= 1);
        assert_eq!(cfg.remote_timeout, None);
    }

    #[test]
    fn reads_all_variables() {
        let cfg = config(&[(WORKING_DIR_VAR, "/data/run1"),
                           (LOCAL_THREADS_VAR, "4"),
                           (STRICT_PARAMETERS_VAR, "Yes"),
                           (REMOTE_TIMEOUT_VAR, "90")]).unwrap();
        assert_eq!(cfg.working_directory, PathBuf::from("/data/run1"));
        assert_eq!(cfg.local_threads, 4);
        assert!(cfg.strict_parameters);
        assert_eq!(cfg.remote_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(config(&[(LOCAL_THREADS_VAR, "many")]), Err(ConfigurationError::Env { .. })));
        assert!(matches!(config(&[(LOCAL_THREADS_VAR, "0")]), Err(ConfigurationError::Env { .. })));
        assert!(matches!(config(&[(STRICT_PARAMETERS_VAR, "maybe")]), Err(ConfigurationError::Env { .. })));
        assert!(matches!(config(&[(REMOTE_TIMEOUT_VAR, "-3")]), Err(ConfigurationError::Env { .. })));
    }
}
