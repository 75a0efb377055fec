// Thu Oct 15 2026 - Alex

use crate::config::GenerationPolicy;
use crate::export::ExportRecord;
use crate::filter::NameFilter;
use crate::forward::{ExportName, ForwardTarget, ForwardingDeclaration, GenerationStats};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub renamed_base: String,
    pub declarations: Vec<ForwardingDeclaration>,
    pub stats: GenerationStats,
}

/// Turns classified export records into forwarding declarations. Output
/// depends only on the records and the policy.
pub struct ForwardGenerator<'a> {
    policy: &'a GenerationPolicy,
    filter: &'a NameFilter,
    renamed_base: String,
}

impl<'a> ForwardGenerator<'a> {
    pub fn new(policy: &'a GenerationPolicy, filter: &'a NameFilter, base_name: &str) -> Self {
        Self {
            policy,
            filter,
            renamed_base: policy.renamed_base(base_name),
        }
    }

    pub fn renamed_base(&self) -> &str {
        &self.renamed_base
    }

    pub fn generate(&self, records: &[ExportRecord]) -> Generation {
        let mut stats = GenerationStats::default();
        let mut declarations = Vec::with_capacity(records.len());

        for record in records {
            if record.is_gap() {
                if self.policy.keep_ordinals {
                    stats.gaps += 1;
                }
                continue;
            }

            if record.probable_data {
                stats.probable_data += 1;
            }

            if !self.filter.passes(record) {
                log::trace!("Filtered out {}", record);
                continue;
            }

            let declaration = self.declare(record, &mut stats);
            if self.policy.verbose {
                log::info!("{}", declaration);
            } else {
                log::trace!("{}", declaration);
            }
            declarations.push(declaration);
        }

        log::debug!("Generated {} declarations ({})", declarations.len(), stats);

        Generation {
            renamed_base: self.renamed_base.clone(),
            declarations,
            stats,
        }
    }

    fn declare(&self, record: &ExportRecord, stats: &mut GenerationStats) -> ForwardingDeclaration {
        let export = match &record.name {
            Some(name) => ExportName::Named(name.clone()),
            None => ExportName::Ordinal(record.ordinal),
        };

        let native = record
            .native_forward()
            .filter(|_| self.policy.respect_existing_forwarders);

        let target = match native {
            Some(target) => {
                stats.kept_forwarders += 1;
                ForwardTarget::Native(target.to_string())
            }
            None => {
                match export {
                    ExportName::Named(_) => stats.by_name += 1,
                    ExportName::Ordinal(_) => stats.by_ordinal += 1,
                }
                ForwardTarget::Renamed {
                    base: self.renamed_base.clone(),
                    symbol: export.clone(),
                }
            }
        };

        ForwardingDeclaration {
            ordinal: record.ordinal,
            export,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(ordinal: u32, name: Option<&str>) -> ExportRecord {
        ExportRecord::new(ordinal, name.map(str::to_string), 0x1000 + ordinal * 0x10)
    }

    fn gap(ordinal: u32, name: Option<&str>) -> ExportRecord {
        ExportRecord::new(ordinal, name.map(str::to_string), 0)
    }

    fn forwarder(ordinal: u32, name: Option<&str>, target: &str) -> ExportRecord {
        ExportRecord::new(ordinal, name.map(str::to_string), 0x2100).forwarder(Some(target.to_string()))
    }

    fn run(records: &[ExportRecord], policy: &GenerationPolicy) -> Generation {
        let filter = NameFilter::from_policy(policy).unwrap();
        ForwardGenerator::new(policy, &filter, "Sample").generate(records)
    }

    fn lines(generation: &Generation) -> Vec<String> {
        generation.declarations.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_sample_scenario() {
        let records = vec![
            code(1, Some("Plugin_Add")),
            code(2, Some("Plugin_GetVersion")),
            gap(3, Some("Helper")),
        ];
        let policy = GenerationPolicy::new().with_keep_ordinals(true);
        let generation = run(&records, &policy);

        assert_eq!(
            lines(&generation),
            vec![
                "Plugin_Add -> Sample_orig.Plugin_Add",
                "Plugin_GetVersion -> Sample_orig.Plugin_GetVersion",
            ]
        );
        assert_eq!(
            generation.stats,
            GenerationStats {
                by_name: 2,
                by_ordinal: 0,
                kept_forwarders: 0,
                gaps: 1,
                probable_data: 0,
            }
        );
    }

    #[test]
    fn test_gaps_not_counted_without_keep_ordinals() {
        let records = vec![gap(1, None), code(2, None), gap(3, Some("Reserved"))];
        let generation = run(&records, &GenerationPolicy::new());
        assert_eq!(generation.stats.gaps, 0);
        assert_eq!(lines(&generation), vec!["#2 -> Sample_orig.#2"]);
        assert_eq!(generation.stats.by_ordinal, 1);
    }

    #[test]
    fn test_respect_existing_forwarders() {
        let records = vec![forwarder(1, Some("Fwd"), "Other.Func"), forwarder(2, None, "Dep.#9")];

        let kept = run(&records, &GenerationPolicy::new().with_respect_existing_forwarders(true));
        assert_eq!(lines(&kept), vec!["Fwd -> Other.Func", "#2 -> Dep.#9"]);
        assert_eq!(kept.stats.kept_forwarders, 2);
        assert_eq!(kept.stats.by_name, 0);

        let redirected = run(&records, &GenerationPolicy::new());
        assert_eq!(
            lines(&redirected),
            vec!["Fwd -> Sample_orig.Fwd", "#2 -> Sample_orig.#2"]
        );
        assert_eq!(redirected.stats.kept_forwarders, 0);
        assert_eq!(redirected.stats.by_name, 1);
        assert_eq!(redirected.stats.by_ordinal, 1);
    }

    #[test]
    fn test_empty_forward_target_is_redirected() {
        let records =
            vec![ExportRecord::new(1, Some("Odd".into()), 0x2000).forwarder(Some(String::new()))];
        let generation = run(&records, &GenerationPolicy::new().with_respect_existing_forwarders(true));
        assert_eq!(lines(&generation), vec!["Odd -> Sample_orig.Odd"]);
        assert_eq!(generation.stats.kept_forwarders, 0);
    }

    #[test]
    fn test_filters_apply_to_named_only() {
        let records = vec![
            code(1, Some("Plugin_InternalHelper")),
            code(2, Some("Plugin_Add")),
            code(3, Some("OtherFunc")),
            code(4, None),
        ];
        let policy = GenerationPolicy::new()
            .with_include("^Plugin_")
            .with_exclude("Internal");
        let generation = run(&records, &policy);
        assert_eq!(
            lines(&generation),
            vec!["Plugin_Add -> Sample_orig.Plugin_Add", "#4 -> Sample_orig.#4"]
        );
    }

    #[test]
    fn test_probable_data_counted_before_filtering() {
        let records = vec![
            code(1, Some("gTable")).with_probable_data(true),
            code(2, Some("Run")),
            gap(3, None),
        ];
        let policy = GenerationPolicy::new().with_exclude("^g");
        let generation = run(&records, &policy);
        assert_eq!(generation.stats.probable_data, 1);
        assert_eq!(generation.declarations.len(), 1);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let records = vec![
            code(1, Some("A")),
            forwarder(2, Some("B"), "X.Y"),
            gap(3, None),
            code(4, None),
        ];
        let policy = GenerationPolicy::new()
            .with_keep_ordinals(true)
            .with_respect_existing_forwarders(true);
        let first = run(&records, &policy);
        let second = run(&records, &policy);
        assert_eq!(first, second);
        assert_eq!(lines(&first), lines(&second));
        assert_eq!(first.stats.declarations(), first.declarations.len());
    }

    #[test]
    fn test_declarations_keep_record_order() {
        let records: Vec<_> = (1..=20).map(|i| code(i, None)).collect();
        let generation = run(&records, &GenerationPolicy::new());
        let ordinals: Vec<u32> = generation.declarations.iter().map(|d| d.ordinal).collect();
        assert_eq!(ordinals, (1..=20).collect::<Vec<_>>());
    }
}
