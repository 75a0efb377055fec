// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Gap,
    Forwarder,
    Code,
    Data,
}

/// One slot of the export address table, decoupled from the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub ordinal: u32,
    pub name: Option<String>,
    pub address: u32,
    pub is_forwarder: bool,
    pub forward_target: Option<String>,
    pub probable_data: bool,
}

impl ExportRecord {
    pub fn new(ordinal: u32, name: Option<String>, address: u32) -> Self {
        Self {
            ordinal,
            name,
            address,
            is_forwarder: false,
            forward_target: None,
            probable_data: false,
        }
    }

    pub fn forwarder(mut self, target: Option<String>) -> Self {
        self.is_forwarder = true;
        self.forward_target = target;
        self
    }

    pub fn with_probable_data(mut self, probable_data: bool) -> Self {
        self.probable_data = probable_data;
        self
    }

    pub fn is_gap(&self) -> bool {
        self.address == 0
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn kind(&self) -> ExportKind {
        if self.is_gap() {
            ExportKind::Gap
        } else if self.is_forwarder {
            ExportKind::Forwarder
        } else if self.probable_data {
            ExportKind::Data
        } else {
            ExportKind::Code
        }
    }

    /// The forwarder string if one was resolved and is non-empty.
    pub fn native_forward(&self) -> Option<&str> {
        match (self.is_forwarder, self.forward_target.as_deref()) {
            (true, Some(target)) if !target.is_empty() => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for ExportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (#{})", name, self.ordinal)?,
            None => write!(f, "#{}", self.ordinal)?,
        }
        match self.kind() {
            ExportKind::Gap => write!(f, " <gap>"),
            ExportKind::Forwarder => {
                write!(f, " -> {}", self.forward_target.as_deref().unwrap_or("?"))
            }
            ExportKind::Code => write!(f, " @ 0x{:08x}", self.address),
            ExportKind::Data => write!(f, " @ 0x{:08x} [data]", self.address),
        }
    }
}
