use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    #[serde(default = "ServerConfig::default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "ServerConfig::default_result_dir")]
    pub result_dir: PathBuf,
    #[serde(
        with = "humantime_serde",
        default = "ServerConfig::default_request_timeout"
    )]
    pub request_timeout: Duration,
    /// Upper bound for a whole multipart request body, in bytes.
    #[serde(default = "ServerConfig::default_max_upload_size")]
    pub max_upload_size: usize,
}

impl ServerConfig {
    fn default_port() -> u16 {
        8080
    }

    fn default_host() -> String {
        String::from("localhost")
    }

    fn default_upload_dir() -> PathBuf {
        PathBuf::from("uploads")
    }

    fn default_result_dir() -> PathBuf {
        PathBuf::from("results")
    }

    fn default_request_timeout() -> Duration {
        Duration::from_secs(30)
    }

    fn default_max_upload_size() -> usize {
        16 * 1024 * 1024
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            upload_dir: Self::default_upload_dir(),
            result_dir: Self::default_result_dir(),
            request_timeout: Self::default_request_timeout(),
            max_upload_size: Self::default_max_upload_size(),
        }
    }
}
