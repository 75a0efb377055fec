// Thu Oct 15 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
}

impl ImageError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedHeader(msg.into())
    }
}
