use serde::{Deserialize, Serialize};

use medgrid_core::{DomainError, DomainResult, FacilityId};

/// A hospital or clinic node in the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub city: String,
    pub total_beds: u64,
}

impl Facility {
    pub fn new(
        id: FacilityId,
        name: impl Into<String>,
        city: impl Into<String>,
        total_beds: u64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("facility name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            city: city.into(),
            total_beds,
        })
    }
}
