mod category;
mod finding;
mod sample;
mod severity;
pub mod snapshot;

pub use category::Category;
pub use finding::Finding;
pub use sample::sample_snapshot;
pub use severity::SeverityLevel;
pub use snapshot::{
    CategorySection, LibraryStats, ReportLinks, ReportSnapshot, ScanInfo, SeverityBucket,
    SnapshotError,
};
