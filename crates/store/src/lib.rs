//! Persistence boundary for the metrics engine.
//!
//! Two abstract collaborators, specified only at their contract:
//!
//! - [`AppendLog`]: append-only record log. Appends are atomic and each record
//!   is visible to subsequent reads before the append returns.
//! - [`ReferenceStore`]: keyed reference records (facilities, inventory).
//!
//! The engine never retries or swallows [`StoreError`]; retry/backoff belongs
//! to the transport layer. In-memory implementations back tests and dev.

pub mod error;
pub mod filters;
pub mod log;
pub mod memory;
pub mod reference;

pub use error::StoreError;
pub use filters::{
    BedEventFilter, FacilityFilter, ItemFilter, ReportFilter, UsageEventFilter,
};
pub use log::{AppendLog, RecordFilter};
pub use memory::{
    InMemoryBedLog, InMemoryFacilityRegistry, InMemoryItemRegistry, InMemoryLog,
    InMemoryRegistry, InMemoryReportLog, InMemoryUsageLog,
};
pub use reference::ReferenceStore;
