// Thu Oct 15 2026 - Alex

pub mod config;
pub mod export;
pub mod filter;
pub mod forward;
pub mod image;
pub mod output;
pub mod pipeline;
pub mod utils;

pub use config::{ConfigError, GenerationPolicy};
pub use export::{parse_exports, ExportError, ExportParser, ExportRecord, ExportTable};
pub use filter::{FilterError, NameFilter};
pub use forward::{ForwardGenerator, ForwardingDeclaration, Generation, GenerationStats};
pub use image::{AddressTranslator, ImageError, ImageView};
pub use output::{OutputError, OutputManager};
pub use pipeline::{resolve_input, EngineError, ProxyPipeline, ProxyPlan};
