// Thu Oct 15 2026 - Alex

pub mod def;
pub mod error;
pub mod host;
pub mod json;
pub mod linker;
pub mod manager;

pub use def::ModuleDefinitionEmitter;
pub use error::OutputError;
pub use host::HostEmitter;
pub use json::{ExportReport, JsonReportEmitter, ReportEntry};
pub use linker::{LinkerSourceEmitter, LINKER_SOURCE_NAME};
pub use manager::OutputManager;
