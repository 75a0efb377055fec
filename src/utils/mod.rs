// Thu Oct 15 2026 - Alex

pub mod logging;
