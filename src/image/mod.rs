// Thu Oct 15 2026 - Alex

pub mod builder;
pub mod error;
pub mod headers;
pub mod section;
pub mod translate;
pub mod view;

pub use builder::{ExportSlot, ImageBuilder, SlotAddress};
pub use error::ImageError;
pub use headers::{DataDirectory, DosHeader, FileHeader, ImageKind, OptionalHeader};
pub use section::{Section, SectionFlags};
pub use translate::AddressTranslator;
pub use view::ImageView;
