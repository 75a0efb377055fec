// Thu Oct 15 2026 - Alex

pub mod directory;
pub mod error;
pub mod parser;
pub mod record;

pub use directory::ExportDirectory;
pub use error::ExportError;
pub use parser::{parse_exports, ExportParser, ExportTable};
pub use record::{ExportKind, ExportRecord};
