pub mod metrics;
pub mod recon;
pub mod scan;
pub mod slip;

pub use metrics::ScanMetrics;
pub use recon::{ReconRow, RowStatus, StatusPolicy, NOT_ON_SLIP};
pub use scan::{NewScan, ScanRow};
pub use slip::{ManifestLine, PackingSlipRow};
