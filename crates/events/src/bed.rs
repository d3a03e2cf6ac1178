use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medgrid_core::{DomainError, DomainResult, FacilityId, RecordId};

use crate::event::Event;

/// Direction of a bed ledger entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BedEventKind {
    Admission,
    Discharge,
}

impl BedEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedEventKind::Admission => "ADMISSION",
            BedEventKind::Discharge => "DISCHARGE",
        }
    }
}

/// An admission or discharge fact for one facility.
///
/// Occupancy is always recomputed from these; there is no stored counter for a
/// concurrent writer to race on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedEvent {
    pub id: RecordId,
    pub facility_id: FacilityId,
    pub kind: BedEventKind,
    pub count: u32,
    pub occurred_at: DateTime<Utc>,
}

impl BedEvent {
    /// Build a validated bed event. `count` must be at least 1; a zero or
    /// missing count is a validation error, never a silent clamp.
    pub fn record(
        facility_id: FacilityId,
        kind: BedEventKind,
        count: u32,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if count < 1 {
            return Err(DomainError::validation("bed event count must be >= 1"));
        }
        Ok(Self {
            id: RecordId::new(),
            facility_id,
            kind,
            count,
            occurred_at,
        })
    }
}

impl Event for BedEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            BedEventKind::Admission => "beds.admission",
            BedEventKind::Discharge => "beds.discharge",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
