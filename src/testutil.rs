//! Test utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::conf::ServerConfig;

pub const MULTIPART_BOUNDARY: &str = "tabconv-test-boundary";

/// Writes `contents` to `dir/name` and returns the full path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// A replication document with surrounding keys and the given table list.
pub fn replication_document(tables: Value) -> Value {
    json!({
        "name": "nightly",
        "cmd.replication_definition": {
            "tasks": [{
                "task": {"name": "oracle-to-pg"},
                "source": {
                    "rep_source": {"source_name": "oracle", "database_name": "PROD"},
                    "source_tables": {
                        "name": "PROD",
                        "explicit_included_tables": tables
                    }
                },
                "target": {"rep_target": {"target_name": "pg"}}
            }]
        },
        "description": "generated"
    })
}

/// Reads the table list back out of a rendered document.
pub fn included_tables(document: &Value) -> &Value {
    &document["cmd.replication_definition"]["tasks"][0]["source"]["source_tables"]
        ["explicit_included_tables"]
}

/// A server config whose upload and result directories live in a fresh temp dir.
pub fn temp_server_config() -> (TempDir, ServerConfig) {
    let dir = TempDir::new().expect("creating temp dir");
    let config = ServerConfig {
        upload_dir: dir.path().join("uploads"),
        result_dir: dir.path().join("results"),
        ..ServerConfig::default()
    };
    (dir, config)
}

/// Builds a `multipart/form-data` body using [`MULTIPART_BOUNDARY`].
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, contents: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(contents);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
