//! Append-only operational records.
//!
//! Every type in this crate is an immutable fact: once written to a log it is
//! never updated or deleted. Derived values (occupancy, stock, baselines) are
//! always recomputed from these records, never stored as mutable counters.

pub mod bed;
pub mod event;
pub mod report;
pub mod usage;

pub use bed::{BedEvent, BedEventKind};
pub use event::Event;
pub use report::{DiseaseReport, Period, Severity};
pub use usage::UsageEvent;
