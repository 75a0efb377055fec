// Thu Oct 15 2026 - Alex

use crate::export::{ExportDirectory, ExportError, ExportRecord};
use crate::image::{AddressTranslator, DataDirectory, ImageView};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub ordinal_base: u32,
    pub dll_name: Option<String>,
    #[serde(skip)]
    pub span: DataDirectory,
    /// Ascending by ordinal. Gap slots are included.
    pub records: Vec<ExportRecord>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ExportRecord> {
        self.records.iter().find(|r| r.name.as_deref() == Some(name))
    }

    pub fn find_by_ordinal(&self, ordinal: u32) -> Option<&ExportRecord> {
        let index = ordinal.checked_sub(self.ordinal_base)? as usize;
        self.records.get(index)
    }
}

pub struct ExportParser<'a> {
    view: &'a ImageView,
    parallel: bool,
}

impl<'a> ExportParser<'a> {
    pub fn new(view: &'a ImageView) -> Self {
        Self {
            view,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn parse(&self) -> Result<ExportTable, ExportError> {
        let span = self
            .view
            .export_directory()
            .filter(DataDirectory::is_present)
            .ok_or(ExportError::NoExportDirectory)?;

        log::debug!(
            "Export directory at RVA 0x{:08x}, size 0x{:x}",
            span.virtual_address,
            span.size
        );

        let tr = self.view.translator();
        let raw = tr
            .read_bytes(span.virtual_address, ExportDirectory::SIZE)
            .ok_or_else(|| {
                ExportError::malformed(format!(
                    "directory RVA 0x{:08x} does not map into the file",
                    span.virtual_address
                ))
            })?;
        let dir = ExportDirectory::parse(raw)?;

        log::debug!(
            "Export directory: base={}, functions={}, names={}",
            dir.base,
            dir.number_of_functions,
            dir.number_of_names
        );

        let count = dir.number_of_functions as usize;
        if dir.base as u64 + count as u64 > u32::MAX as u64 + 1 {
            return Err(ExportError::malformed(format!(
                "ordinal range {}+{} overflows",
                dir.base, count
            )));
        }

        let functions = tr
            .read_u32_array(dir.address_of_functions, count)
            .ok_or_else(|| {
                ExportError::malformed(format!(
                    "function address table at 0x{:08x} ({} entries) is unreadable",
                    dir.address_of_functions, count
                ))
            })?;

        let names = self.index_names(&tr, &dir)?;

        let dll_name = match dir.name_rva {
            0 => None,
            rva => {
                let name = tr.read_c_string(rva);
                if name.is_none() {
                    log::warn!(
                        "{}",
                        ExportError::UnresolvedAddress {
                            rva,
                            what: "image name"
                        }
                    );
                }
                name
            }
        };

        let classify = |i: usize| classify_slot(&tr, span, dir.base, i, functions[i], names[i].clone());
        let records: Vec<ExportRecord> = if self.parallel {
            (0..count).into_par_iter().map(classify).collect()
        } else {
            (0..count).map(classify).collect()
        };

        Ok(ExportTable {
            ordinal_base: dir.base,
            dll_name,
            span,
            records,
        })
    }

    /// Builds the index -> name map in one pass over the parallel name and
    /// name-ordinal arrays. Out-of-range indices are skipped.
    fn index_names(
        &self,
        tr: &AddressTranslator<'_>,
        dir: &ExportDirectory,
    ) -> Result<Vec<Option<String>>, ExportError> {
        let count = dir.number_of_functions as usize;
        let mut index2name = vec![None; count];

        let n_names = dir.number_of_names as usize;
        if n_names == 0 {
            return Ok(index2name);
        }

        let name_rvas = tr.read_u32_array(dir.address_of_names, n_names).ok_or_else(|| {
            ExportError::malformed(format!(
                "name pointer table at 0x{:08x} is unreadable",
                dir.address_of_names
            ))
        })?;
        let name_ordinals = tr
            .read_u16_array(dir.address_of_name_ordinals, n_names)
            .ok_or_else(|| {
                ExportError::malformed(format!(
                    "name ordinal table at 0x{:08x} is unreadable",
                    dir.address_of_name_ordinals
                ))
            })?;

        for (name_rva, index) in name_rvas.into_iter().zip(name_ordinals) {
            let index = index as usize;
            if index >= count {
                log::debug!("Name entry points at index {} past {} functions, skipped", index, count);
                continue;
            }

            match tr.read_c_string(name_rva) {
                Some(name) => index2name[index] = Some(name),
                None => log::warn!(
                    "{} (index {})",
                    ExportError::UnresolvedAddress {
                        rva: name_rva,
                        what: "export name"
                    },
                    index
                ),
            }
        }

        Ok(index2name)
    }
}

fn classify_slot(
    tr: &AddressTranslator<'_>,
    span: DataDirectory,
    base: u32,
    index: usize,
    address: u32,
    name: Option<String>,
) -> ExportRecord {
    let ordinal = base.wrapping_add(index as u32);
    let record = ExportRecord::new(ordinal, name, address);

    if span.contains(address) {
        let target = tr.read_c_string(address);
        if target.is_none() {
            log::warn!(
                "{} (ordinal {})",
                ExportError::UnresolvedAddress {
                    rva: address,
                    what: "forwarder string"
                },
                ordinal
            );
        }
        return record.forwarder(target);
    }

    if address != 0 {
        // Heuristic only: a slot in a non-executable section is probably data.
        let probable_data = tr
            .section_for(address)
            .map(|s| !s.is_executable())
            .unwrap_or(false);
        return record.with_probable_data(probable_data);
    }

    record
}

pub fn parse_exports(view: &ImageView) -> Result<ExportTable, ExportError> {
    ExportParser::new(view).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportKind;
    use crate::image::builder::{ExportSlot, ImageBuilder, SlotAddress, RDATA_RVA, TEXT_RVA};

    fn parse(builder: ImageBuilder) -> Result<ExportTable, ExportError> {
        let view = ImageView::from_bytes(builder.build()).unwrap();
        parse_exports(&view)
    }

    fn sample() -> ImageBuilder {
        ImageBuilder::new()
            .ordinal_base(1)
            .export(ExportSlot::code(Some("Plugin_Add"), TEXT_RVA + 0x10))
            .export(ExportSlot::code(Some("Plugin_GetVersion"), TEXT_RVA + 0x40))
            .export(ExportSlot::gap(Some("Helper")))
    }

    #[test]
    fn test_no_export_directory() {
        assert_eq!(parse(ImageBuilder::new()), Err(ExportError::NoExportDirectory));
    }

    #[test]
    fn test_sample_exports() {
        let table = parse(sample()).unwrap();
        assert_eq!(table.ordinal_base, 1);
        assert_eq!(table.dll_name.as_deref(), Some("Sample.dll"));
        assert_eq!(table.len(), 3);

        let add = &table.records[0];
        assert_eq!(add.ordinal, 1);
        assert_eq!(add.name.as_deref(), Some("Plugin_Add"));
        assert_eq!(add.address, TEXT_RVA + 0x10);
        assert_eq!(add.kind(), ExportKind::Code);

        let helper = table.find_by_name("Helper").unwrap();
        assert_eq!(helper.ordinal, 3);
        assert!(helper.is_gap());
        assert!(!helper.probable_data);
    }

    #[test]
    fn test_ordinals_dense_and_ascending() {
        let slots = (0..50).map(|i| {
            if i % 7 == 0 {
                ExportSlot::gap(None)
            } else if i % 3 == 0 {
                ExportSlot::code(None, TEXT_RVA + i)
            } else {
                ExportSlot::code(Some(format!("Fn{:02}", 50 - i).as_str()), TEXT_RVA + i)
            }
        });
        let table = parse(ImageBuilder::new().ordinal_base(100).exports(slots)).unwrap();
        assert_eq!(table.len(), 50);
        for (i, record) in table.records.iter().enumerate() {
            assert_eq!(record.ordinal, 100 + i as u32);
        }
        assert_eq!(table.find_by_ordinal(149).unwrap().ordinal, 149);
        assert!(table.find_by_ordinal(99).is_none());
        assert!(table.find_by_ordinal(150).is_none());
    }

    #[test]
    fn test_forwarder_and_data_classification() {
        let table = parse(
            ImageBuilder::new()
                .export(ExportSlot::forwarder(Some("Fwd"), "Other.Func"))
                .export(ExportSlot::forwarder(None, "NTDLL.RtlAllocateHeap"))
                .export(ExportSlot::code(Some("gTable"), RDATA_RVA + 0x1f0))
                .export(ExportSlot::code(Some("Orphan"), 0x9000)),
        )
        .unwrap();

        let fwd = &table.records[0];
        assert!(fwd.is_forwarder);
        assert_eq!(fwd.forward_target.as_deref(), Some("Other.Func"));
        assert!(!fwd.probable_data);

        let unnamed = &table.records[1];
        assert!(unnamed.name.is_none());
        assert_eq!(unnamed.native_forward(), Some("NTDLL.RtlAllocateHeap"));

        assert!(table.records[2].probable_data);
        assert_eq!(table.records[2].kind(), ExportKind::Data);

        // No containing section: not flagged as data.
        assert!(!table.records[3].probable_data);
        assert_eq!(table.records[3].kind(), ExportKind::Code);
    }

    #[test]
    fn test_forwarder_span_boundaries() {
        let table = parse(
            ImageBuilder::new()
                .export(ExportSlot::at(Some("AtStart"), SlotAddress::DirectoryStart))
                .export(ExportSlot::at(Some("AtEnd"), SlotAddress::DirectoryEnd)),
        )
        .unwrap();

        let start = &table.records[0];
        assert_eq!(start.address, table.span.virtual_address);
        assert!(start.is_forwarder);

        let end = &table.records[1];
        assert_eq!(end.address as u64, table.span.end());
        assert!(!end.is_forwarder);
        assert!(end.forward_target.is_none());
        assert!(end.probable_data);
    }

    #[test]
    fn test_out_of_range_name_index_skipped() {
        let table = parse(sample().extra_name(Some("Bogus"), 99)).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.find_by_name("Bogus").is_none());
    }

    #[test]
    fn test_unresolved_name_keeps_record() {
        let table = parse(
            ImageBuilder::new()
                .export(ExportSlot::code(None, TEXT_RVA))
                .extra_name(None, 0),
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.records[0].name.is_none());
        assert_eq!(table.records[0].address, TEXT_RVA);
    }

    #[test]
    fn test_unterminated_forwarder_keeps_record() {
        let table = parse(
            ImageBuilder::new()
                .export(ExportSlot::code(Some("Plugin_Add"), TEXT_RVA))
                .export(ExportSlot::at(
                    Some("Broken"),
                    SlotAddress::Unterminated("Other.Func".into()),
                )),
        )
        .unwrap();

        let record = table.find_by_name("Broken").unwrap();
        assert!(record.is_forwarder);
        assert!(record.forward_target.is_none());
        assert_eq!(record.kind(), ExportKind::Forwarder);
        assert!(table.span.contains(record.address));

        let policy = crate::config::GenerationPolicy::new().with_respect_existing_forwarders(true);
        let filter = crate::filter::NameFilter::from_policy(&policy).unwrap();
        let generation =
            crate::forward::ForwardGenerator::new(&policy, &filter, "Sample").generate(&table.records);
        let lines: Vec<String> = generation.declarations.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            lines,
            vec!["Plugin_Add -> Sample_orig.Plugin_Add", "Broken -> Sample_orig.Broken"]
        );
        assert_eq!(generation.stats.kept_forwarders, 0);
    }

    #[test]
    fn test_unreadable_function_table_is_malformed() {
        let result = parse(sample().functions_rva(0x7000_0000));
        assert!(matches!(result, Err(ExportError::MalformedDirectory(_))));
    }

    #[test]
    fn test_empty_directory() {
        let table = parse(ImageBuilder::new().with_export_directory()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_dll_name() {
        let table = parse(sample().dll_name(None)).unwrap();
        assert!(table.dll_name.is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let slots = (0..200u32).map(|i| match i % 4 {
            0 => ExportSlot::gap(None),
            1 => ExportSlot::forwarder(Some(format!("F{}", i).as_str()), &format!("Dep.F{}", i)),
            2 => ExportSlot::code(Some(format!("C{}", i).as_str()), TEXT_RVA + i),
            _ => ExportSlot::code(None, RDATA_RVA + i),
        });
        let view = ImageView::from_bytes(ImageBuilder::new().exports(slots).build()).unwrap();

        let sequential = ExportParser::new(&view).parse().unwrap();
        let parallel = ExportParser::new(&view).with_parallel(true).parse().unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.records[199].ordinal, 200);
    }
}
