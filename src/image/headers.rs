// Thu Oct 15 2026 - Alex

use super::error::ImageError;
use super::section::{le_u16, le_u32, le_u64};
use goblin::pe::{header, optional_header};

pub const DOS_HEADER_SIZE: usize = 0x40;
pub const E_LFANEW_OFFSET: usize = 0x3c;
pub const COFF_HEADER_SIZE: usize = 20;
pub const DATA_DIRECTORY_SIZE: usize = 8;
pub const DIRECTORY_ENTRY_EXPORT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosHeader {
    pub e_magic: u16,
    pub e_lfanew: u32,
}

impl DosHeader {
    pub fn parse(data: &[u8]) -> Result<Self, ImageError> {
        if data.len() < DOS_HEADER_SIZE {
            return Err(ImageError::malformed(format!(
                "file is {} bytes, too small for a DOS header",
                data.len()
            )));
        }

        let e_magic = le_u16(data, 0).ok_or_else(|| ImageError::malformed("truncated DOS header"))?;
        if e_magic != header::DOS_MAGIC {
            return Err(ImageError::malformed(format!(
                "bad DOS signature 0x{:04x}",
                e_magic
            )));
        }

        let e_lfanew = le_u32(data, E_LFANEW_OFFSET)
            .ok_or_else(|| ImageError::malformed("truncated DOS header"))?;

        Ok(Self { e_magic, e_lfanew })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub size_of_optional_header: u16,
    pub characteristics: u16,
}

impl FileHeader {
    pub fn parse(data: &[u8], offset: usize) -> Result<Self, ImageError> {
        let raw = offset
            .checked_add(COFF_HEADER_SIZE)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| ImageError::malformed("file header out of bounds"))?;

        Ok(Self {
            machine: le_u16(raw, 0).unwrap_or_default(),
            number_of_sections: le_u16(raw, 2).unwrap_or_default(),
            time_date_stamp: le_u32(raw, 4).unwrap_or_default(),
            size_of_optional_header: le_u16(raw, 16).unwrap_or_default(),
            characteristics: le_u16(raw, 18).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataDirectory {
    pub virtual_address: u32,
    pub size: u32,
}

impl DataDirectory {
    pub fn is_present(&self) -> bool {
        self.virtual_address != 0 && self.size != 0
    }

    pub fn end(&self) -> u64 {
        self.virtual_address as u64 + self.size as u64
    }

    /// Half-open containment over `[virtual_address, virtual_address + size)`.
    pub fn contains(&self, rva: u32) -> bool {
        (rva as u64) >= self.virtual_address as u64 && (rva as u64) < self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Pe32,
    Pe32Plus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalHeader {
    pub kind: ImageKind,
    pub image_base: u64,
    pub data_directories: Vec<DataDirectory>,
}

impl OptionalHeader {
    /// `raw` is exactly the optional header as sized by the file header.
    pub fn parse(raw: &[u8]) -> Result<Self, ImageError> {
        let magic = le_u16(raw, 0).ok_or_else(|| ImageError::malformed("optional header is empty"))?;

        let (kind, image_base, count_offset) = match magic {
            optional_header::MAGIC_32 => {
                let base = le_u32(raw, 28).map(u64::from);
                (ImageKind::Pe32, base, 92)
            }
            optional_header::MAGIC_64 => (ImageKind::Pe32Plus, le_u64(raw, 24), 108),
            other => {
                return Err(ImageError::malformed(format!(
                    "unknown optional header magic 0x{:04x}",
                    other
                )))
            }
        };

        let image_base = image_base.ok_or_else(|| ImageError::malformed("optional header truncated"))?;
        let count = le_u32(raw, count_offset)
            .ok_or_else(|| ImageError::malformed("optional header truncated before data directories"))?;

        let dirs_offset = count_offset + 4;
        let mut data_directories = Vec::new();
        for i in 0..count as usize {
            let at = dirs_offset + i * DATA_DIRECTORY_SIZE;
            // Entries past the declared optional header size are ignored.
            let (Some(virtual_address), Some(size)) = (le_u32(raw, at), le_u32(raw, at + 4)) else {
                break;
            };
            data_directories.push(DataDirectory { virtual_address, size });
        }

        Ok(Self {
            kind,
            image_base,
            data_directories,
        })
    }

    pub fn data_directory(&self, index: usize) -> Option<DataDirectory> {
        self.data_directories.get(index).copied()
    }
}
