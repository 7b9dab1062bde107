// Public modules
pub mod config;
pub mod export;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod service;
pub mod topics;
pub mod week;

// Re-export commonly used types
pub use config::Config;
pub use export::{MarkdownExporter, PdfExporter};
pub use io::BriefingStore;
pub use models::{Briefing, SectionResult, Submission};
pub use pipeline::{BriefingPipeline, Origin, Progress};
pub use service::{PerplexityClient, Recency, SearchRequest, ServiceError, SummaryService};
pub use topics::{BriefingConfig, TopicSpec};
pub use week::WeekKey;
