// Thu Oct 15 2026 - Alex

use crate::config::{ConfigError, GenerationPolicy};
use crate::export::{ExportError, ExportParser, ExportTable};
use crate::filter::{FilterError, NameFilter};
use crate::forward::{ForwardGenerator, Generation};
use crate::image::{ImageError, ImageView};
use crate::output::OutputError;
use crate::utils::logging::ScopedTimer;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl EngineError {
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Usage(_) | EngineError::Config(_) | EngineError::Filter(_) => 1,
            EngineError::Image(ImageError::NotFound(_)) => 2,
            EngineError::Image(_) => 3,
            EngineError::Export(_) => 4,
            EngineError::Output(_) => 5,
        }
    }
}

/// Everything one run produces before anything is written.
#[derive(Debug, Clone)]
pub struct ProxyPlan {
    pub image_path: PathBuf,
    pub base_name: String,
    pub table: ExportTable,
    pub generation: Generation,
}

impl ProxyPlan {
    pub fn renamed_base(&self) -> &str {
        &self.generation.renamed_base
    }
}

pub struct ProxyPipeline {
    policy: GenerationPolicy,
    filter: NameFilter,
}

impl ProxyPipeline {
    /// Fails on a bad policy or pattern before any image is touched.
    pub fn new(policy: GenerationPolicy) -> Result<Self, EngineError> {
        policy.validate()?;
        let filter = NameFilter::from_policy(&policy)?;
        Ok(Self { policy, filter })
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<ProxyPlan, EngineError> {
        let path = path.as_ref();
        let base_name = base_name(path)?;

        log::debug!("Loading {}", path.display());
        let view = ImageView::open(path)?;
        self.plan(view, path.to_path_buf(), base_name)
    }

    /// Same as [`run`](Self::run) for an image already in memory.
    pub fn run_bytes(&self, data: Vec<u8>, base_name: &str) -> Result<ProxyPlan, EngineError> {
        let view = ImageView::from_bytes(data)?;
        self.plan(view, PathBuf::from(format!("{}.dll", base_name)), base_name.to_string())
    }

    fn plan(
        &self,
        view: ImageView,
        image_path: PathBuf,
        base_name: String,
    ) -> Result<ProxyPlan, EngineError> {
        let table = {
            let _timer = ScopedTimer::new("export parse");
            ExportParser::new(&view)
                .with_parallel(self.policy.parallel)
                .parse()?
        };

        log::info!(
            "Parsed {} export slots (base {}, dll name {})",
            table.len(),
            table.ordinal_base,
            table.dll_name.as_deref().unwrap_or("<none>")
        );

        let generation =
            ForwardGenerator::new(&self.policy, &self.filter, &base_name).generate(&table.records);

        log::info!("{}", generation.stats);

        Ok(ProxyPlan {
            image_path,
            base_name,
            table,
            generation,
        })
    }
}

/// Resolves `<image.dll>` or `<directory> <image-name>` to an image path.
pub fn resolve_input(first: &Path, second: Option<&str>) -> Result<PathBuf, EngineError> {
    if has_dll_extension(first) {
        return Ok(first.to_path_buf());
    }

    match second {
        Some(name) => {
            let mut path = first.join(name);
            if Path::new(name).extension().is_none() {
                path.set_extension("dll");
            }
            Ok(path)
        }
        None if first.is_dir() => Err(EngineError::Usage(format!(
            "{} is a directory; give the image name as the second argument",
            first.display()
        ))),
        None => Ok(first.to_path_buf()),
    }
}

fn has_dll_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("dll"))
        .unwrap_or(false)
}

fn base_name(path: &Path) -> Result<String, EngineError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| EngineError::Usage(format!("{} has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::builder::TEXT_RVA;
    use crate::image::{ExportSlot, ImageBuilder};

    fn sample() -> Vec<u8> {
        ImageBuilder::new()
            .exports([
                ExportSlot::code(Some("Plugin_Add"), TEXT_RVA + 0x10),
                ExportSlot::code(Some("Plugin_GetVersion"), TEXT_RVA + 0x20),
                ExportSlot::gap(Some("Helper")),
            ])
            .build()
    }

    #[test]
    fn test_run_bytes() {
        let pipeline = ProxyPipeline::new(GenerationPolicy::new().with_keep_ordinals(true)).unwrap();
        let plan = pipeline.run_bytes(sample(), "Sample").unwrap();

        assert_eq!(plan.base_name, "Sample");
        assert_eq!(plan.renamed_base(), "Sample_orig");
        assert_eq!(plan.table.len(), 3);
        assert_eq!(plan.generation.declarations.len(), 2);
        assert_eq!(plan.generation.stats.gaps, 1);
    }

    #[test]
    fn test_bad_pattern_rejected_before_open() {
        let err = ProxyPipeline::new(GenerationPolicy::new().with_include("(")).err().unwrap();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_bad_suffix_rejected() {
        let err = ProxyPipeline::new(GenerationPolicy::new().with_rename_suffix(""))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        let pipeline = ProxyPipeline::new(GenerationPolicy::new()).unwrap();

        let missing = pipeline.run("/definitely/not/here/Sample.dll").err().unwrap();
        assert_eq!(missing.exit_code(), 2);

        let bad = pipeline.run_bytes(b"not an image".to_vec(), "Junk").err().unwrap();
        assert_eq!(bad.exit_code(), 3);

        let no_exports = pipeline.run_bytes(ImageBuilder::new().build(), "Empty").err().unwrap();
        assert!(matches!(no_exports, EngineError::Export(ExportError::NoExportDirectory)));
        assert_eq!(no_exports.exit_code(), 4);

        let output = EngineError::from(OutputError::io(
            "x",
            std::io::Error::new(std::io::ErrorKind::Other, "denied"),
        ));
        assert_eq!(output.exit_code(), 5);
    }

    #[test]
    fn test_resolve_input() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(
            resolve_input(Path::new("bin/Sample.DLL"), Some("ignored")).unwrap(),
            PathBuf::from("bin/Sample.DLL")
        );
        assert_eq!(
            resolve_input(dir.path(), Some("version")).unwrap(),
            dir.path().join("version.dll")
        );
        assert_eq!(
            resolve_input(dir.path(), Some("winmm.drv")).unwrap(),
            dir.path().join("winmm.drv")
        );
        assert!(matches!(
            resolve_input(dir.path(), None),
            Err(EngineError::Usage(_))
        ));
    }
}
