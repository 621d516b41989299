//! Inbound forecast request

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::models::horizon::HorizonSpec;
use crate::models::region::Region;

/// Body of a forecast request.
///
/// Either `year` (default yearly horizon) or the four month-range fields must be
/// supplied. The Spanish field names used by the original web form are accepted
/// as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ForecastRequest {
    #[serde(default, alias = "departamento")]
    pub region: Option<String>,

    #[serde(default, alias = "año")]
    #[validate(range(min = 1, max = 9999))]
    pub year: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 9999))]
    pub start_year: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 12))]
    pub start_month: Option<u32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 9999))]
    pub end_year: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 12))]
    pub end_month: Option<u32>,
}

impl ForecastRequest {
    /// A yearly request for `region` starting at `year`
    pub fn yearly(region: &str, year: i32) -> Self {
        Self {
            region: Some(region.to_string()),
            year: Some(year),
            ..Self::default()
        }
    }

    /// A month-range request for `region`
    pub fn monthly(region: &str, start: (i32, u32), end: (i32, u32)) -> Self {
        Self {
            region: Some(region.to_string()),
            start_year: Some(start.0),
            start_month: Some(start.1),
            end_year: Some(end.0),
            end_month: Some(end.1),
            ..Self::default()
        }
    }

    /// Resolve the region against the closed catalog
    pub fn region(&self) -> Result<Region, DomainError> {
        self.region
            .as_deref()
            .ok_or(DomainError::MissingField("region"))?
            .parse()
    }

    /// True when any month-range field is present
    pub fn is_range_request(&self) -> bool {
        self.start_year.is_some()
            || self.start_month.is_some()
            || self.end_year.is_some()
            || self.end_month.is_some()
    }

    /// Determine the requested horizon.
    ///
    /// A request carrying any month-range field is a range request and needs all
    /// four; otherwise `year` is required.
    pub fn horizon_spec(&self) -> Result<HorizonSpec, DomainError> {
        if self.is_range_request() {
            return Ok(HorizonSpec::Monthly {
                start_year: self.start_year.ok_or(DomainError::MissingField("start_year"))?,
                start_month: self.start_month.ok_or(DomainError::MissingField("start_month"))?,
                end_year: self.end_year.ok_or(DomainError::MissingField("end_year"))?,
                end_month: self.end_month.ok_or(DomainError::MissingField("end_month"))?,
            });
        }

        let start_year = self.year.ok_or(DomainError::MissingField("year"))?;
        Ok(HorizonSpec::Yearly {
            start_year,
            end_year: None,
        })
    }
}
