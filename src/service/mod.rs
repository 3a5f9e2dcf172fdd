pub mod ingest;
pub mod metrics;
pub mod reconcile;
pub mod scans;

pub use ingest::{parse_manifest, ManifestService, ParsedManifest, UploadOutcome};
pub use metrics::{summarize, MetricsService};
pub use reconcile::{reconcile, ReconcileService};
pub use scans::ScanService;
