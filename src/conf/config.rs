use crate::{
    conf::ServerConfig,
    core::TabconvError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "TABCONV";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, TabconvError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Loads the optional TOML file at `path`, then applies `TABCONV_`-prefixed
    /// environment overrides such as `TABCONV_SERVER__PORT=9000`.
    pub fn load(path: Option<&str>) -> Result<Config, TabconvError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, TabconvError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [server]
        host = "127.0.0.1"
        port = 3000
        upload_dir = "/tmp/up"
        request_timeout = "5s"
        "#;
        let conf = Config::from_str(toml);
        assert_eq!(
            conf,
            Ok(Config {
                server: ServerConfig {
                    host: String::from("127.0.0.1"),
                    port: 3000,
                    upload_dir: PathBuf::from("/tmp/up"),
                    request_timeout: Duration::from_secs(5),
                    ..ServerConfig::default()
                }
            })
        );
    }

    #[test]
    fn load_empty_toml_uses_defaults() {
        assert_eq!(Config::from_str(""), Ok(Config::default()));
    }

    #[test]
    fn reject_unknown_field() {
        let toml = r#"
        [server]
        hostname = "127.0.0.1"
        "#;
        assert!(matches!(Config::from_str(toml), Err(ConfigParsingError(_))));
    }

    #[test]
    fn load_missing_file_fails() {
        let res = Config::load(Some("/definitely/not/here/tabconv.toml"));
        assert!(matches!(res, Err(ConfigParsingError(_))));
    }
}
