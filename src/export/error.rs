// Thu Oct 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Image has no export directory")]
    NoExportDirectory,
    #[error("Malformed export directory: {0}")]
    MalformedDirectory(String),
    #[error("Unresolved address 0x{rva:08x} while reading {what}")]
    UnresolvedAddress { rva: u32, what: &'static str },
}

impl ExportError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedDirectory(msg.into())
    }
}
