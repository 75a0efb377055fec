// Thu Oct 15 2026 - Alex

use super::section::{le_u16, le_u32, Section};

/// Maps RVAs to file offsets through the section table. Every read is
/// fallible; `None` means the data is unavailable, never zero.
#[derive(Clone, Copy)]
pub struct AddressTranslator<'a> {
    sections: &'a [Section],
    data: &'a [u8],
}

impl<'a> AddressTranslator<'a> {
    pub fn new(sections: &'a [Section], data: &'a [u8]) -> Self {
        Self { sections, data }
    }

    /// First section in stored order whose virtual range holds `rva`.
    /// Overlapping sections are not rejected.
    pub fn section_for(&self, rva: u32) -> Option<&'a Section> {
        self.sections.iter().find(|s| s.contains(rva))
    }

    pub fn translate(&self, rva: u32) -> Option<usize> {
        let section = self.section_for(rva)?;
        let offset = section.pointer_to_raw_data as u64 + (rva - section.virtual_address) as u64;
        if offset >= self.data.len() as u64 {
            return None;
        }
        Some(offset as usize)
    }

    pub fn read_bytes(&self, rva: u32, len: usize) -> Option<&'a [u8]> {
        let offset = self.translate(rva)?;
        self.data.get(offset..offset.checked_add(len)?)
    }

    pub fn read_u16(&self, rva: u32) -> Option<u16> {
        le_u16(self.data, self.translate(rva)?)
    }

    pub fn read_u32(&self, rva: u32) -> Option<u32> {
        le_u32(self.data, self.translate(rva)?)
    }

    pub fn read_u32_array(&self, rva: u32, count: usize) -> Option<Vec<u32>> {
        let raw = self.read_bytes(rva, count.checked_mul(4)?)?;
        Some(
            raw.chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    pub fn read_u16_array(&self, rva: u32, count: usize) -> Option<Vec<u16>> {
        let raw = self.read_bytes(rva, count.checked_mul(2)?)?;
        Some(
            raw.chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        )
    }

    /// Reads a NUL-terminated string. A string with no terminator before the
    /// end of the region is treated as unresolved.
    pub fn read_c_string(&self, rva: u32) -> Option<String> {
        let offset = self.translate(rva)?;
        let window = self.data.get(offset..)?;
        let nul = window.iter().position(|&b| b == 0)?;
        Some(String::from_utf8_lossy(&window[..nul]).into_owned())
    }
}
