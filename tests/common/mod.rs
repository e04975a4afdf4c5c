#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// A syntactically valid 40 character key.
pub const API_KEY: &str = "0123456789abcdef0123456789abcdef01234567";
pub const API_PATH: &str = "/planetary/apod";

pub fn record_json(date: &str, title: &str) -> String {
    format!(
        r#"{{"date":"{date}","title":"{title}","explanation":"About {title}.","url":"https://apod.nasa.gov/{date}.jpg","media_type":"image","service_version":"v1"}}"#
    )
}

/// Isolated storage directory plus a command preconfigured to use it.
pub struct TestEnv {
    _tmp: TempDir,
    pub apods: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let apods = tmp.path().join("apods");
        fs::create_dir_all(&apods).expect("create storage dir");
        Self { _tmp: tmp, apods }
    }

    /// `apod` with a valid key and an API URL nothing listens on.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("apod");
        cmd.env("APODS_PATH", &self.apods)
            .env("APOD_API_KEY", API_KEY)
            .env("APOD_API_URL", "http://127.0.0.1:9/planetary/apod")
            .env_remove("APOD_MAX_RESPONSE_BYTES")
            .env_remove("APOD_LOG");
        cmd
    }

    /// `apod` pointed at a fake endpoint.
    pub fn cmd_against(&self, api: &FakeApod) -> Command {
        let mut cmd = self.cmd();
        cmd.env("APOD_API_URL", api.url());
        cmd
    }

    pub fn path(&self, date: &str) -> PathBuf {
        self.apods.join(format!("{date}.json"))
    }

    pub fn write(&self, date: &str, contents: &str) -> PathBuf {
        let path = self.path(date);
        fs::write(&path, contents).expect("write record");
        path
    }

    pub fn read(&self, date: &str) -> String {
        fs::read_to_string(self.path(date)).expect("read record")
    }
}

/// wiremock server standing in for the APOD endpoint. The runtime lives as
/// long as the server so blocking calls from the test thread can reach it.
pub struct FakeApod {
    runtime: Runtime,
    server: MockServer,
}

impl FakeApod {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn url(&self) -> String {
        format!("{}{API_PATH}", self.server.uri())
    }

    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}
