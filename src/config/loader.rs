//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::environment::EnvSource;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then environment
/// overrides. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>, env: &impl EnvSource) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `HOST`, `PORT`, `METRICS_ADDRESS` and `SHUTDOWN_GRACE_SECS`.
pub fn apply_env_overrides(config: &mut GatewayConfig, env: &impl EnvSource) -> Result<(), ConfigError> {
    if let Some(host) = env.non_empty("HOST") {
        config.listener.host = host;
    }

    if let Some(port) = env.non_empty("PORT") {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var: "PORT", value: port })?;
    }

    if let Some(addr) = env.non_empty("METRICS_ADDRESS") {
        config.observability.metrics_address = Some(addr);
    }

    if let Some(grace) = env.non_empty("SHUTDOWN_GRACE_SECS") {
        config.timeouts.shutdown_grace_secs = grace.trim().parse().map_err(|_| ConfigError::Env {
            var: "SHUTDOWN_GRACE_SECS",
            value: grace,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn no_overrides_gives_defaults() {
        let env: HashMap<&str, &str> = HashMap::new();
        let config = load_config(None, &env).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn env_overrides_listener() {
        let env = HashMap::from([("HOST", "127.0.0.1"), ("PORT", "9090")]);
        let config = load_config(None, &env).unwrap();
        assert_eq!(config.listener.bind_address(), "127.0.0.1:9090");
    }

    #[test]
    fn bad_port_is_rejected() {
        let env = HashMap::from([("PORT", "eighty")]);
        let err = load_config(None, &env).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "PORT", .. }));
    }

    #[test]
    fn zero_grace_fails_validation() {
        let env = HashMap::from([("SHUTDOWN_GRACE_SECS", "0")]);
        let err = load_config(None, &env).unwrap_err();
        assert!(err.to_string().contains("timeouts.shutdown_grace_secs"));
    }

    #[test]
    fn env_wins_over_file() {
        let path = std::env::temp_dir().join(format!("api-gateway-loader-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[listener]\nhost = \"127.0.0.1\"\nport = 7000\n\n[timeouts]\nidle_secs = 5").unwrap();

        let env = HashMap::from([("PORT", "7001")]);
        let config = load_config(Some(&path), &env).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.listener.host, "127.0.0.1");
        assert_eq!(config.listener.port, 7001);
        assert_eq!(config.timeouts.idle_secs, 5);
        assert_eq!(config.timeouts.read_secs, 15);
    }

    #[test]
    fn missing_file_is_io_error() {
        let env: HashMap<&str, &str> = HashMap::new();
        let err = load_config(Some(Path::new("/definitely/not/here.toml")), &env).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
