//! Explicitly-scheduled background scans over the derived metrics engine.
//!
//! Each job *calls* the same pure engine functions the request path uses, so
//! scan cadence stays decoupled from the core computation and both remain
//! independently testable. Jobs never mutate domain state; they produce alert
//! batches for the (out-of-scope) notification transport.

pub mod job;
pub mod scan;
pub mod scheduler;

pub use job::{Alert, AlertBatch, AlertError, AlertJob, AlertKind};
pub use scan::{OutbreakScanJob, WastageScanJob};
pub use scheduler::LocalAlertScheduler;
