// Thu Oct 15 2026 - Alex

use crate::export::{ExportRecord, ExportTable};
use crate::forward::GenerationStats;
use crate::output::OutputError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry<'a> {
    pub ordinal: u32,
    pub name: &'a str,
    pub rva: u32,
    pub is_forward: bool,
    pub probable_data: bool,
    pub forward_target: &'a str,
}

impl<'a> From<&'a ExportRecord> for ReportEntry<'a> {
    fn from(record: &'a ExportRecord) -> Self {
        Self {
            ordinal: record.ordinal,
            name: record.name.as_deref().unwrap_or(""),
            rva: record.address,
            is_forward: record.is_forwarder,
            probable_data: record.probable_data,
            forward_target: record.forward_target.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport<'a> {
    pub dll_name: Option<&'a str>,
    pub ordinal_base: u32,
    pub stats: GenerationStats,
    pub exports: Vec<ReportEntry<'a>>,
}

pub struct JsonReportEmitter;

impl JsonReportEmitter {
    pub fn file_name(base_name: &str) -> String {
        format!("exports_{}.json", base_name)
    }

    /// Serializes the full, unfiltered record list.
    pub fn render(table: &ExportTable, stats: &GenerationStats) -> Result<String, OutputError> {
        let report = ExportReport {
            dll_name: table.dll_name.as_deref(),
            ordinal_base: table.ordinal_base,
            stats: *stats,
            exports: table.records.iter().map(ReportEntry::from).collect(),
        };
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::DataDirectory;
    use serde_json::Value;

    #[test]
    fn test_render_report() {
        let table = ExportTable {
            ordinal_base: 1,
            dll_name: Some("Sample.dll".into()),
            span: DataDirectory::default(),
            records: vec![
                ExportRecord::new(1, Some("Plugin_Add".into()), 0x1010),
                ExportRecord::new(2, None, 0x2100).forwarder(Some("Other.Func".into())),
                ExportRecord::new(3, Some("Helper".into()), 0),
            ],
        };

        let text = JsonReportEmitter::render(&table, &GenerationStats::default()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["dll_name"], "Sample.dll");
        let exports = value["exports"].as_array().unwrap();
        assert_eq!(exports.len(), 3);
        assert_eq!(exports[0]["name"], "Plugin_Add");
        assert_eq!(exports[0]["rva"], 0x1010);
        assert_eq!(exports[1]["name"], "");
        assert_eq!(exports[1]["is_forward"], true);
        assert_eq!(exports[1]["forward_target"], "Other.Func");
        assert_eq!(exports[2]["rva"], 0);
        assert_eq!(value["stats"]["by_name"], 0);
    }
}
