#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use brandgate::config::{AppState, Config, DashboardEntry};
use brandgate::handler::handle_request;
use brandgate::http::HttpResponse;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::Request;
use tempfile::TempDir;

/// Asset tree with a brand directory and the static fallback tree
pub struct TestTree {
    pub dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        for sub in ["brand/default", "brand/acme", "static/custom/img", "static/custom/css"] {
            fs::create_dir_all(dir.path().join(sub)).expect("create asset dirs");
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &[u8]) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, content).expect("write asset");
    }
}

pub fn config_for(root: &Path) -> Config {
    let mut config = Config::load_from("does-not-exist/brandgate").expect("default config");
    config.branding.root_dir = root.to_path_buf();
    config.logging.access_log = false;
    config.dashboards.default = "settings".to_string();
    config.dashboards.registered = vec![
        DashboardEntry {
            slug: "settings".to_string(),
            url: None,
        },
        DashboardEntry {
            slug: "project".to_string(),
            url: None,
        },
    ];
    config
}

pub fn state_for(root: &Path) -> Arc<AppState> {
    Arc::new(AppState::new(config_for(root)).expect("valid state"))
}

pub fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

/// Build a GET request with optional extra headers
pub fn get(uri: &str, headers: &[(&str, &str)]) -> Request<()> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap()
}

pub async fn send(state: &Arc<AppState>, req: Request<()>) -> HttpResponse {
    handle_request(req, Arc::clone(state), peer()).await.unwrap()
}

pub async fn body_bytes(resp: HttpResponse) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

pub fn set_cookies(resp: &HttpResponse) -> Vec<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
