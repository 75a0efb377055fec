// Thu Oct 15 2026 - Alex

use crate::forward::{ExportName, ForwardTarget, ForwardingDeclaration, Generation};
use std::fmt::Write;

pub struct ModuleDefinitionEmitter;

impl ModuleDefinitionEmitter {
    pub fn file_name(base_name: &str) -> String {
        format!("{}.def", base_name)
    }

    pub fn render(base_name: &str, generation: &Generation) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "LIBRARY {}", base_name);
        let _ = writeln!(out, "EXPORTS");
        for decl in &generation.declarations {
            let _ = writeln!(out, "{}", Self::entry(&generation.renamed_base, decl));
        }
        out
    }

    /// Ordinal-only entries always point into the renamed image; a kept
    /// forwarder only survives for named exports.
    fn entry(renamed_base: &str, decl: &ForwardingDeclaration) -> String {
        match &decl.export {
            ExportName::Named(name) => {
                let target = match &decl.target {
                    ForwardTarget::Native(target) => target.clone(),
                    ForwardTarget::Renamed { base, .. } => format!("{}.{}", base, name),
                };
                format!("{}={}", name, target)
            }
            ExportName::Ordinal(ordinal) => {
                format!("@{}={}.@{} NONAME", ordinal, renamed_base, ordinal)
            }
        }
    }
}
