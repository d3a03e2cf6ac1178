//! Derived metrics engine.
//!
//! Read-side computations that turn append-only operational logs into
//! point-in-time answers: current bed occupancy, current item stock, wastage
//! risk, outbreak/pandemic risk. Nothing here holds mutable state — every
//! query recomputes from the logs, so concurrent writers can only append and
//! can never race a counter.

pub mod aggregate;
pub mod error;
pub mod occupancy;
pub mod outbreak;
pub mod wastage;

pub use aggregate::{group_by, sum_by};
pub use error::{EngineError, EngineResult};
pub use occupancy::OccupancyLedger;
pub use outbreak::{
    BaselineAnalysis, BaselineOutcome, OutbreakConfig, OutbreakDetector, PandemicAlert,
    PandemicReport,
};
pub use wastage::{
    CategorySummary, CategoryWastage, CityWastageSummary, WastageBand, WastageResult,
    WastageScorer, WastageThresholds, WastageTotals, score_item,
};
