// Thu Oct 15 2026 - Alex

use bitflags::bitflags;
use goblin::pe::section_table;
use std::fmt;

pub const SECTION_HEADER_SIZE: usize = 40;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionFlags: u32 {
        const CNT_CODE = section_table::IMAGE_SCN_CNT_CODE;
        const CNT_INITIALIZED_DATA = section_table::IMAGE_SCN_CNT_INITIALIZED_DATA;
        const CNT_UNINITIALIZED_DATA = section_table::IMAGE_SCN_CNT_UNINITIALIZED_DATA;
        const MEM_EXECUTE = section_table::IMAGE_SCN_MEM_EXECUTE;
        const MEM_READ = section_table::IMAGE_SCN_MEM_READ;
        const MEM_WRITE = section_table::IMAGE_SCN_MEM_WRITE;

        const _ = !0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
    pub flags: SectionFlags,
}

impl Section {
    /// Decodes one 40-byte section header. `raw` must hold at least
    /// `SECTION_HEADER_SIZE` bytes.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let raw = raw.get(..SECTION_HEADER_SIZE)?;
        let name_len = raw[..8].iter().position(|&b| b == 0).unwrap_or(8);
        let name = String::from_utf8_lossy(&raw[..name_len]).into_owned();

        Some(Self {
            name,
            virtual_size: le_u32(raw, 8)?,
            virtual_address: le_u32(raw, 12)?,
            size_of_raw_data: le_u32(raw, 16)?,
            pointer_to_raw_data: le_u32(raw, 20)?,
            flags: SectionFlags::from_bits_retain(le_u32(raw, 36)?),
        })
    }

    pub fn contains(&self, rva: u32) -> bool {
        let start = self.virtual_address as u64;
        let end = start + self.virtual_size as u64;
        (rva as u64) >= start && (rva as u64) < end
    }

    pub fn is_executable(&self) -> bool {
        self.flags.contains(SectionFlags::MEM_EXECUTE)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} va=0x{:08x} vsize=0x{:08x} raw=0x{:08x} {}",
            self.name,
            self.virtual_address,
            self.virtual_size,
            self.pointer_to_raw_data,
            if self.is_executable() { "x" } else { "-" }
        )
    }
}

pub(crate) fn le_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn le_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn le_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset.checked_add(8)?)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_le_bytes(buf))
}
