// Thu Oct 15 2026 - Alex

//! Assembles small PE32+ images with an export table. Used to produce
//! deterministic inputs for the parser without shipping binary samples.
//!
//! Limits: at most 65535 slots (name ordinals are 16-bit), and the export
//! data must fit in a few megabytes of `.rdata`. Exceeding them produces a
//! wrong image or panics; this is fixture code, not a PE writer.

use super::section::SectionFlags;
use goblin::pe::{header, optional_header};

pub const TEXT_RVA: u32 = 0x1000;
pub const TEXT_SIZE: u32 = 0x200;
pub const RDATA_RVA: u32 = 0x2000;

const E_LFANEW: usize = 0x80;
const OPTIONAL_HEADER_SIZE: usize = 0xF0;
const TEXT_RAW: u32 = 0x200;
const RDATA_RAW: u32 = 0x400;
const FILE_ALIGNMENT: usize = 0x200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAddress {
    Zero,
    Rva(u32),
    Forwarder(String),
    /// Resolved at build time to the first byte of the export directory.
    DirectoryStart,
    /// Resolved at build time to one past the last byte of the export directory.
    DirectoryEnd,
    /// Forwarder string written last with no terminator; the rest of the
    /// file is filled with non-zero bytes.
    Unterminated(String),
}

#[derive(Debug, Clone)]
pub struct ExportSlot {
    pub name: Option<String>,
    pub address: SlotAddress,
}

impl ExportSlot {
    pub fn code(name: Option<&str>, rva: u32) -> Self {
        Self {
            name: name.map(str::to_string),
            address: SlotAddress::Rva(rva),
        }
    }

    pub fn forwarder(name: Option<&str>, target: &str) -> Self {
        Self {
            name: name.map(str::to_string),
            address: SlotAddress::Forwarder(target.to_string()),
        }
    }

    pub fn gap(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            address: SlotAddress::Zero,
        }
    }

    pub fn at(name: Option<&str>, address: SlotAddress) -> Self {
        Self {
            name: name.map(str::to_string),
            address,
        }
    }
}

#[derive(Debug, Clone)]
struct ExtraName {
    name: Option<String>,
    index: u16,
}

#[derive(Debug, Clone)]
pub struct ImageBuilder {
    ordinal_base: u32,
    dll_name: Option<String>,
    slots: Vec<ExportSlot>,
    extra_names: Vec<ExtraName>,
    functions_rva_override: Option<u32>,
    force_export_directory: bool,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            ordinal_base: 1,
            dll_name: Some("Sample.dll".to_string()),
            slots: Vec::new(),
            extra_names: Vec::new(),
            functions_rva_override: None,
            force_export_directory: false,
        }
    }

    pub fn ordinal_base(mut self, base: u32) -> Self {
        self.ordinal_base = base;
        self
    }

    pub fn dll_name(mut self, name: Option<&str>) -> Self {
        self.dll_name = name.map(str::to_string);
        self
    }

    pub fn export(mut self, slot: ExportSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn exports<I: IntoIterator<Item = ExportSlot>>(mut self, slots: I) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Adds a name-table entry pointing at `index` without a matching slot.
    /// `None` writes a name RVA that no section contains.
    pub fn extra_name(mut self, name: Option<&str>, index: u16) -> Self {
        self.extra_names.push(ExtraName {
            name: name.map(str::to_string),
            index,
        });
        self
    }

    pub fn functions_rva(mut self, rva: u32) -> Self {
        self.functions_rva_override = Some(rva);
        self
    }

    /// Emits an export directory even when no slots were added.
    pub fn with_export_directory(mut self) -> Self {
        self.force_export_directory = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let has_exports = self.force_export_directory || !self.slots.is_empty();
        let (rdata, export_size) = if has_exports {
            self.build_export_data()
        } else {
            (vec![0u8; 0x10], 0)
        };

        // One spare byte keeps the directory's exclusive end inside `.rdata`.
        let rdata_raw_size = align(rdata.len() + 1, FILE_ALIGNMENT);
        let mut image = vec![0u8; RDATA_RAW as usize + rdata_raw_size];

        // DOS header
        image[0..2].copy_from_slice(&header::DOS_MAGIC.to_le_bytes());
        put_u32(&mut image, 0x3c, E_LFANEW as u32);

        // NT signature + COFF header
        put_u32(&mut image, E_LFANEW, header::PE_MAGIC);
        let coff = E_LFANEW + 4;
        put_u16(&mut image, coff, 0x8664);
        put_u16(&mut image, coff + 2, 2);
        put_u16(&mut image, coff + 16, OPTIONAL_HEADER_SIZE as u16);
        put_u16(&mut image, coff + 18, 0x2022);

        // Optional header (PE32+)
        let opt = coff + 20;
        put_u16(&mut image, opt, optional_header::MAGIC_64);
        image[opt + 24..opt + 32].copy_from_slice(&0x1_8000_0000u64.to_le_bytes());
        put_u32(&mut image, opt + 32, 0x1000);
        put_u32(&mut image, opt + 36, FILE_ALIGNMENT as u32);
        put_u32(&mut image, opt + 108, 16);
        if has_exports {
            put_u32(&mut image, opt + 112, RDATA_RVA);
            put_u32(&mut image, opt + 116, export_size);
        }

        // Section table
        let table = opt + OPTIONAL_HEADER_SIZE;
        write_section(
            &mut image,
            table,
            b".text",
            TEXT_RVA,
            TEXT_SIZE,
            TEXT_RAW,
            TEXT_SIZE,
            SectionFlags::CNT_CODE | SectionFlags::MEM_EXECUTE | SectionFlags::MEM_READ,
        );
        write_section(
            &mut image,
            table + 40,
            b".rdata",
            RDATA_RVA,
            rdata_raw_size as u32,
            RDATA_RAW,
            rdata_raw_size as u32,
            SectionFlags::CNT_INITIALIZED_DATA | SectionFlags::MEM_READ,
        );

        let text = TEXT_RAW as usize;
        image[text..text + TEXT_SIZE as usize].fill(0xCC);

        let rdata_at = RDATA_RAW as usize;
        image[rdata_at..rdata_at + rdata.len()].copy_from_slice(&rdata);
        if self.has_open_tail() {
            image[rdata_at + rdata.len()..].fill(0xCC);
        }

        image
    }

    fn has_open_tail(&self) -> bool {
        self.slots
            .iter()
            .any(|s| matches!(s.address, SlotAddress::Unterminated(_)))
    }

    /// Lays out the export directory at the start of `.rdata` and returns the
    /// section bytes together with the directory span size.
    fn build_export_data(&self) -> (Vec<u8>, u32) {
        let n_funcs = self.slots.len();

        let mut names: Vec<(String, u16)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.name.clone().map(|n| (n, i as u16)))
            .collect();
        names.sort();

        let n_names = names.len() + self.extra_names.len();

        let functions_at = 40usize;
        let names_at = functions_at + n_funcs * 4;
        let ordinals_at = names_at + n_names * 4;
        let strings_start = ordinals_at + n_names * 2;

        let mut strings: Vec<u8> = Vec::new();
        let push_string = |s: &str, strings: &mut Vec<u8>| -> u32 {
            let rva = RDATA_RVA + (strings_start + strings.len()) as u32;
            strings.extend_from_slice(s.as_bytes());
            strings.push(0);
            rva
        };

        let dll_name_rva = match &self.dll_name {
            Some(name) => push_string(name, &mut strings),
            None => 0,
        };

        let mut name_entries: Vec<(u32, u16)> = Vec::with_capacity(n_names);
        for (name, index) in &names {
            let rva = push_string(name, &mut strings);
            name_entries.push((rva, *index));
        }
        for extra in &self.extra_names {
            let rva = match &extra.name {
                Some(name) => push_string(name, &mut strings),
                None => 0xdead_0000,
            };
            name_entries.push((rva, extra.index));
        }

        let mut function_rvas = Vec::with_capacity(n_funcs);
        let mut pending_bounds = Vec::new();
        let mut pending_tails = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let rva = match &slot.address {
                SlotAddress::Zero => 0,
                SlotAddress::Rva(rva) => *rva,
                SlotAddress::Forwarder(target) => push_string(target, &mut strings),
                SlotAddress::DirectoryStart | SlotAddress::DirectoryEnd => {
                    pending_bounds.push(i);
                    0
                }
                SlotAddress::Unterminated(_) => {
                    pending_tails.push(i);
                    0
                }
            };
            function_rvas.push(rva);
        }

        for &i in &pending_tails {
            if let SlotAddress::Unterminated(text) = &self.slots[i].address {
                function_rvas[i] = RDATA_RVA + (strings_start + strings.len()) as u32;
                strings.extend_from_slice(text.as_bytes());
            }
        }

        let export_len = strings_start + strings.len();
        let export_size = export_len as u32;

        for i in pending_bounds {
            function_rvas[i] = match self.slots[i].address {
                SlotAddress::DirectoryStart => RDATA_RVA,
                _ => RDATA_RVA + export_size,
            };
        }

        let mut data = vec![0u8; export_len];
        put_u32(&mut data, 12, dll_name_rva);
        put_u32(&mut data, 16, self.ordinal_base);
        put_u32(&mut data, 20, n_funcs as u32);
        put_u32(&mut data, 24, n_names as u32);
        put_u32(
            &mut data,
            28,
            self.functions_rva_override
                .unwrap_or(RDATA_RVA + functions_at as u32),
        );
        put_u32(&mut data, 32, RDATA_RVA + names_at as u32);
        put_u32(&mut data, 36, RDATA_RVA + ordinals_at as u32);

        for (i, rva) in function_rvas.iter().enumerate() {
            put_u32(&mut data, functions_at + i * 4, *rva);
        }
        for (i, (rva, index)) in name_entries.iter().enumerate() {
            put_u32(&mut data, names_at + i * 4, *rva);
            put_u16(&mut data, ordinals_at + i * 2, *index);
        }

        data[strings_start..].copy_from_slice(&strings);

        (data, export_size)
    }
}

#[allow(clippy::too_many_arguments)]
fn write_section(
    image: &mut [u8],
    at: usize,
    name: &[u8],
    va: u32,
    vsize: u32,
    raw: u32,
    raw_size: u32,
    flags: SectionFlags,
) {
    image[at..at + name.len()].copy_from_slice(name);
    put_u32(image, at + 8, vsize);
    put_u32(image, at + 12, va);
    put_u32(image, at + 16, raw_size);
    put_u32(image, at + 20, raw);
    put_u32(image, at + 36, flags.bits());
}

fn put_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn align(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}
