// Thu Oct 15 2026 - Alex

use crate::export::ExportError;
use crate::image::section::{le_u16, le_u32};

/// IMAGE_EXPORT_DIRECTORY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportDirectory {
    pub characteristics: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub name_rva: u32,
    pub base: u32,
    pub number_of_functions: u32,
    pub number_of_names: u32,
    pub address_of_functions: u32,
    pub address_of_names: u32,
    pub address_of_name_ordinals: u32,
}

impl ExportDirectory {
    pub const SIZE: usize = 40;

    pub fn parse(data: &[u8]) -> Result<Self, ExportError> {
        if data.len() < Self::SIZE {
            return Err(ExportError::malformed(format!(
                "directory needs {} bytes, got {}",
                Self::SIZE,
                data.len()
            )));
        }

        let u32_at = |at| le_u32(data, at).unwrap_or_default();
        let u16_at = |at| le_u16(data, at).unwrap_or_default();

        Ok(Self {
            characteristics: u32_at(0),
            time_date_stamp: u32_at(4),
            major_version: u16_at(8),
            minor_version: u16_at(10),
            name_rva: u32_at(12),
            base: u32_at(16),
            number_of_functions: u32_at(20),
            number_of_names: u32_at(24),
            address_of_functions: u32_at(28),
            address_of_names: u32_at(32),
            address_of_name_ordinals: u32_at(36),
        })
    }
}
