pub mod config;
pub mod delay_manager;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod fetcher;
pub mod filter;
pub mod logger;
pub mod paginator;
pub mod pipeline;
pub mod record;
pub mod stats;

// Exporting types for convenience
pub use config::ClientConfig;
pub use delay_manager::PageDelay;
pub use error::{ExportError, FetchError};
pub use exporter::{Column, CsvSink, RowSink};
pub use extractor::Extractor;
pub use fetcher::{FetchQuery, HttpPageFetcher, Page, PageFetcher};
pub use filter::{DateWindow, FilterCriteria};
pub use paginator::{Collection, Paginator, StopReason};
pub use pipeline::Pipeline;
pub use record::JobRecord;
pub use stats::{ZoneStats, ZoneTypeKey};
