use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Fixtures;
use crate::export::{HostShare, ShareText};
use crate::shell::Shell;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub fixtures: Fixtures,
    pub fixtures_path: Option<PathBuf>,
    pub shell: Shell,
    pub share: Box<dyn ShareText>,
}

impl AppState {
    pub fn new(fixtures: Fixtures, fixtures_path: Option<PathBuf>) -> Self {
        Self::with_share(fixtures, fixtures_path, Box::new(HostShare))
    }

    pub fn with_share(
        fixtures: Fixtures,
        fixtures_path: Option<PathBuf>,
        share: Box<dyn ShareText>,
    ) -> Self {
        Self {
            fixtures,
            fixtures_path,
            shell: Shell::new(),
            share,
        }
    }
}
