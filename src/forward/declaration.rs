// Thu Oct 15 2026 - Alex

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportName {
    Named(String),
    Ordinal(u32),
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Ordinal(ordinal) => write!(f, "#{}", ordinal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardTarget {
    /// An existing `Image.Symbol` forwarder kept verbatim.
    Native(String),
    /// The same symbol in the renamed original image.
    Renamed { base: String, symbol: ExportName },
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(target) => f.write_str(target),
            Self::Renamed { base, symbol } => write!(f, "{}.{}", base, symbol),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ForwardingDeclaration {
    pub ordinal: u32,
    pub export: ExportName,
    pub target: ForwardTarget,
}

impl ForwardingDeclaration {
    pub fn is_native(&self) -> bool {
        matches!(self.target, ForwardTarget::Native(_))
    }

    pub fn is_by_ordinal(&self) -> bool {
        matches!(self.export, ExportName::Ordinal(_))
    }

    /// MSVC `/export:` argument, e.g. `Foo=Foo_orig.Foo` or `#3=Foo_orig.#3`.
    pub fn linker_directive(&self) -> String {
        format!("/export:{}={}", self.export, self.target)
    }
}

impl fmt::Display for ForwardingDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.export, self.target)
    }
}
