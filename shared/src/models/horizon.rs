//! Forecast horizon construction
//!
//! A horizon is the ordered, contiguous sequence of time indices a forecast is
//! produced for. Two granularities are supported:
//!
//! - **Yearly**: every year in `[start, end)`, defaulting to an 8-year span
//! - **Monthly**: every month from `(start_year, start_month)` through
//!   `(end_year, end_month)` inclusive, spanning at most 8 calendar years

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validation::{validate_month, validate_year, validate_year_span};

/// Number of yearly points produced when no end year is given
pub const DEFAULT_SPAN_YEARS: i32 = 8;

/// Largest `end_year - start_year` accepted for monthly horizons
pub const MAX_SPAN_YEARS: i32 = 8;

/// Horizon granularity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Yearly,
    Monthly,
}

/// A single step of a forecast horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeIndex {
    Year(i32),
    Month { year: i32, month: u32 },
}

impl TimeIndex {
    pub fn granularity(&self) -> Granularity {
        match self {
            TimeIndex::Year(_) => Granularity::Yearly,
            TimeIndex::Month { .. } => Granularity::Monthly,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            TimeIndex::Year(year) | TimeIndex::Month { year, .. } => *year,
        }
    }

    /// Numeric time feature fed to the forecast model.
    ///
    /// Months map onto fractional years so that both granularities share one scale.
    pub fn feature(&self) -> f64 {
        match self {
            TimeIndex::Year(year) => f64::from(*year),
            TimeIndex::Month { year, month } => f64::from(*year) + (f64::from(*month) - 1.0) / 12.0,
        }
    }

    /// Chart label, e.g. `2025` or `2025-03`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeIndex::Year(year) => write!(f, "{}", year),
            TimeIndex::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

/// Requested time range, before validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HorizonSpec {
    Yearly {
        start_year: i32,
        end_year: Option<i32>,
    },
    Monthly {
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    },
}

/// Ordered, non-empty sequence of time indices
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Horizon {
    granularity: Granularity,
    indices: Vec<TimeIndex>,
}

impl Horizon {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn indices(&self) -> &[TimeIndex] {
        &self.indices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeIndex> {
        self.indices.iter()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false for a horizon produced by [`HorizonBuilder`]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn first(&self) -> TimeIndex {
        self.indices[0]
    }

    pub fn last(&self) -> TimeIndex {
        self.indices[self.indices.len() - 1]
    }

    pub fn labels(&self) -> Vec<String> {
        self.indices.iter().map(TimeIndex::label).collect()
    }
}

impl<'a> IntoIterator for &'a Horizon {
    type Item = &'a TimeIndex;
    type IntoIter = std::slice::Iter<'a, TimeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Expands a [`HorizonSpec`] into a validated [`Horizon`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonBuilder {
    default_span_years: i32,
    max_span_years: i32,
}

impl Default for HorizonBuilder {
    fn default() -> Self {
        Self {
            default_span_years: DEFAULT_SPAN_YEARS,
            max_span_years: MAX_SPAN_YEARS,
        }
    }
}

impl HorizonBuilder {
    pub fn new(default_span_years: i32) -> Self {
        Self {
            default_span_years,
            ..Self::default()
        }
    }

    pub fn build(&self, spec: &HorizonSpec) -> Result<Horizon, DomainError> {
        match *spec {
            HorizonSpec::Yearly {
                start_year,
                end_year,
            } => self.yearly(start_year, end_year),
            HorizonSpec::Monthly {
                start_year,
                start_month,
                end_year,
                end_month,
            } => self.monthly(start_year, start_month, end_year, end_month),
        }
    }

    /// Every year in `[start_year, end_year)`; a zero span yields `start_year` alone
    pub fn yearly(&self, start_year: i32, end_year: Option<i32>) -> Result<Horizon, DomainError> {
        validate_year(start_year).map_err(range_error)?;

        let end_year = match end_year {
            Some(end) => end,
            None => start_year
                .checked_add(self.default_span_years)
                .ok_or_else(|| range_error("Default span overflows the year range"))?,
        };
        validate_year(end_year).map_err(range_error)?;

        let span = i64::from(end_year) - i64::from(start_year);
        if span < 0 {
            return Err(DomainError::InvalidRange(format!(
                "End year {} is before start year {}",
                end_year, start_year
            )));
        }

        let indices = if span == 0 {
            vec![TimeIndex::Year(start_year)]
        } else {
            (start_year..end_year).map(TimeIndex::Year).collect()
        };

        Ok(Horizon {
            granularity: Granularity::Yearly,
            indices,
        })
    }

    /// Every month from `(start_year, start_month)` through `(end_year, end_month)` inclusive
    pub fn monthly(
        &self,
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    ) -> Result<Horizon, DomainError> {
        validate_year(start_year).map_err(range_error)?;
        validate_year(end_year).map_err(range_error)?;
        validate_month(start_month).map_err(range_error)?;
        validate_month(end_month).map_err(range_error)?;
        validate_year_span(start_year, end_year, self.max_span_years).map_err(range_error)?;

        if start_year == end_year && end_month < start_month {
            return Err(DomainError::InvalidRange(format!(
                "End month {} is before start month {} in {}",
                end_month, start_month, start_year
            )));
        }

        let mut indices = Vec::new();
        for year in start_year..=end_year {
            let first = if year == start_year { start_month } else { 1 };
            let last = if year == end_year { end_month } else { 12 };
            indices.extend((first..=last).map(|month| TimeIndex::Month { year, month }));
        }

        Ok(Horizon {
            granularity: Granularity::Monthly,
            indices,
        })
    }
}

fn range_error(message: &str) -> DomainError {
    DomainError::InvalidRange(message.to_string())
}
