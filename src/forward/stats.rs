// Thu Oct 15 2026 - Alex

use serde::Serialize;
use std::fmt;

/// Diagnostic counters only; nothing branches on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub by_name: usize,
    pub by_ordinal: usize,
    pub kept_forwarders: usize,
    pub gaps: usize,
    pub probable_data: usize,
}

impl GenerationStats {
    pub fn declarations(&self) -> usize {
        self.by_name + self.by_ordinal + self.kept_forwarders
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "byName={} byOrdinal={} keptForwarders={} gaps(RVA=0)={} probableData={}",
            self.by_name, self.by_ordinal, self.kept_forwarders, self.gaps, self.probable_data
        )
    }
}
