use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading resume data or producing the document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("expected a mapping at the root of the {0} document")]
    NotAMapping(&'static str),

    #[error("missing section `{0}`")]
    MissingSection(&'static str),

    #[error("section `{section}`: {source}")]
    Section {
        section: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Attach a file path to a parse error raised while reading that file.
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Error::Parse(source) => Error::Yaml {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
