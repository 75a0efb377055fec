// Thu Oct 15 2026 - Alex

use crate::export::ExportTable;
use crate::forward::Generation;
use crate::output::def::ModuleDefinitionEmitter;
use crate::output::host::HostEmitter;
use crate::output::json::JsonReportEmitter;
use crate::output::linker::{LinkerSourceEmitter, LINKER_SOURCE_NAME};
use crate::output::OutputError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the artifact set for one run. `dllmain.cpp` is always produced;
/// the others are opt-in.
pub struct OutputManager {
    output_dir: PathBuf,
    base_name: String,
    emit_def: bool,
    emit_json: bool,
    emit_host: bool,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>>(output_dir: P, base_name: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.to_string(),
            emit_def: false,
            emit_json: false,
            emit_host: false,
        }
    }

    pub fn with_def(mut self, enabled: bool) -> Self {
        self.emit_def = enabled;
        self
    }

    pub fn with_json(mut self, enabled: bool) -> Self {
        self.emit_json = enabled;
        self
    }

    pub fn with_host(mut self, enabled: bool) -> Self {
        self.emit_host = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the written paths in emission order.
    pub fn write_all(
        &self,
        table: &ExportTable,
        generation: &Generation,
    ) -> Result<Vec<PathBuf>, OutputError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| OutputError::io(&self.output_dir, e))?;

        let mut written = Vec::new();

        written.push(self.write(LINKER_SOURCE_NAME, &LinkerSourceEmitter::render(generation))?);

        if self.emit_def {
            written.push(self.write(
                &ModuleDefinitionEmitter::file_name(&self.base_name),
                &ModuleDefinitionEmitter::render(&self.base_name, generation),
            )?);
        }

        if self.emit_json {
            written.push(self.write(
                &JsonReportEmitter::file_name(&self.base_name),
                &JsonReportEmitter::render(table, &generation.stats)?,
            )?);
        }

        if self.emit_host {
            written.push(self.write(
                &HostEmitter::file_name(&self.base_name),
                &HostEmitter::render(&self.base_name),
            )?);
        }

        Ok(written)
    }

    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, OutputError> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, content).map_err(|e| OutputError::io(&path, e))?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}
