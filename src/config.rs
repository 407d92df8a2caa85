use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub data: PathBuf,
    pub projects: PathBuf,
    pub template: PathBuf,
    /// Defaults to the template path, which is then overwritten.
    pub output: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("content/data/about.yml"),
            projects: PathBuf::from("content/data/projects.yml"),
            template: PathBuf::from("resume/main.tex"),
            output: None,
        }
    }
}

impl PathsConfig {
    /// Where the filled document is written.
    pub fn output(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.template)
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
