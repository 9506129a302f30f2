use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /fetch_parcel_ui`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ParcelLookupRequest {
    pub full_address: Option<String>,
    pub county_name: Option<String>,
}

impl ParcelLookupRequest {
    /// Both fields present and non-blank, or `None`.
    pub fn into_query(self) -> Option<ParcelQuery> {
        let full_address = self.full_address.filter(|a| !a.trim().is_empty())?;
        let county_name = self.county_name.filter(|c| !c.trim().is_empty())?;
        Some(ParcelQuery {
            full_address,
            county_name,
        })
    }
}

/// A validated lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelQuery {
    pub full_address: String,
    pub county_name: String,
}

impl ParcelQuery {
    pub fn new(full_address: impl Into<String>, county_name: impl Into<String>) -> Self {
        Self {
            full_address: full_address.into(),
            county_name: county_name.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParcelResponse {
    pub parcel_id: String,
}
