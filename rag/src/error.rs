use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed: {status} {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{method} {url} decode failed: {detail} | {body}")]
    Decode {
        method: &'static str,
        url: String,
        detail: String,
        body: String,
    },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    InvalidInput(String),

    #[error("worker stopped before producing a result")]
    WorkerLost,

    #[error("failed to write {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
