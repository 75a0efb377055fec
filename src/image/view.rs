// Thu Oct 15 2026 - Alex

use super::error::ImageError;
use super::headers::{
    DataDirectory, DosHeader, FileHeader, OptionalHeader, COFF_HEADER_SIZE, DIRECTORY_ENTRY_EXPORT,
};
use super::section::{le_u32, Section, SECTION_HEADER_SIZE};
use super::translate::AddressTranslator;
use goblin::pe::header;
use memmap2::Mmap;
use std::fs::File;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};

enum ImageBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for ImageBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => mmap.as_ref(),
            Self::Owned(data) => data.as_slice(),
        }
    }
}

/// A validated, read-only view of a PE image. Every structure reachable from
/// it has already been bounds-checked against the byte region.
pub struct ImageView {
    bytes: ImageBytes,
    path: Option<PathBuf>,
    dos: DosHeader,
    file_header: FileHeader,
    optional_header: OptionalHeader,
    sections: Vec<Section>,
}

impl ImageView {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImageError::NotFound(path.to_path_buf()),
            _ => ImageError::IoFailure(e),
        })?;

        let len = file.metadata()?.len();
        if len == 0 {
            return Err(ImageError::malformed("file is empty"));
        }

        let mmap = unsafe { Mmap::map(&file) }?;
        log::debug!("Mapped {} ({} bytes)", path.display(), mmap.len());

        let mut view = Self::build(ImageBytes::Mapped(mmap))?;
        view.path = Some(path.to_path_buf());
        Ok(view)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ImageError> {
        Self::build(ImageBytes::Owned(data))
    }

    fn build(bytes: ImageBytes) -> Result<Self, ImageError> {
        let data: &[u8] = &bytes;
        let dos = DosHeader::parse(data)?;

        let nt_offset = dos.e_lfanew as usize;
        let signature = le_u32(data, nt_offset).ok_or_else(|| {
            ImageError::malformed(format!(
                "e_lfanew 0x{:x} points outside the file ({} bytes)",
                nt_offset,
                data.len()
            ))
        })?;
        if signature != header::PE_MAGIC {
            return Err(ImageError::malformed(format!(
                "bad PE signature 0x{:08x}",
                signature
            )));
        }

        let file_header = FileHeader::parse(data, nt_offset + 4)?;

        let opt_offset = nt_offset + 4 + COFF_HEADER_SIZE;
        let opt_end = opt_offset + file_header.size_of_optional_header as usize;
        let opt_raw = data
            .get(opt_offset..opt_end)
            .ok_or_else(|| ImageError::malformed("optional header out of bounds"))?;
        let optional_header = OptionalHeader::parse(opt_raw)?;

        let table_len = file_header.number_of_sections as usize * SECTION_HEADER_SIZE;
        let table = data
            .get(opt_end..opt_end + table_len)
            .ok_or_else(|| {
                ImageError::malformed(format!(
                    "section table ({} entries) out of bounds",
                    file_header.number_of_sections
                ))
            })?;

        let sections = table
            .chunks_exact(SECTION_HEADER_SIZE)
            .filter_map(Section::parse)
            .collect::<Vec<_>>();

        log::debug!(
            "{:?} image, machine 0x{:04x}, {} sections, {} data directories",
            optional_header.kind,
            file_header.machine,
            sections.len(),
            optional_header.data_directories.len()
        );
        for section in &sections {
            log::trace!("  {}", section);
        }

        Ok(Self {
            bytes,
            path: None,
            dos,
            file_header,
            optional_header,
            sections,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dos_header(&self) -> &DosHeader {
        &self.dos
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    pub fn optional_header(&self) -> &OptionalHeader {
        &self.optional_header
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn export_directory(&self) -> Option<DataDirectory> {
        self.optional_header.data_directory(DIRECTORY_ENTRY_EXPORT)
    }

    pub fn translator(&self) -> AddressTranslator<'_> {
        AddressTranslator::new(&self.sections, self.data())
    }
}
