// Thu Oct 15 2026 - Alex

pub mod declaration;
pub mod generator;
pub mod stats;

pub use declaration::{ExportName, ForwardTarget, ForwardingDeclaration};
pub use generator::{ForwardGenerator, Generation};
pub use stats::GenerationStats;
