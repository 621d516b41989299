//! Validation utilities for the Climate Advisor platform

// ============================================================================
// Time Range Validations
// ============================================================================

/// Validate a calendar month (1-12)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate a calendar year accepted by the forecast horizon
pub fn validate_year(year: i32) -> Result<(), &'static str> {
    if !(1..=9999).contains(&year) {
        return Err("Year must be between 1 and 9999");
    }
    Ok(())
}

/// Validate that a year span is non-negative and does not exceed `max_span`
pub fn validate_year_span(start_year: i32, end_year: i32, max_span: i32) -> Result<(), &'static str> {
    let span = i64::from(end_year) - i64::from(start_year);
    if span < 0 {
        return Err("End year must not be before start year");
    }
    if span > i64::from(max_span) {
        return Err("Requested span exceeds the maximum number of years");
    }
    Ok(())
}

// ============================================================================
// Synthesis Parameter Validations
// ============================================================================

/// Validate the half-width of the display fluctuation band
pub fn validate_fluctuation_band(band: f64) -> Result<(), &'static str> {
    if !band.is_finite() || band < 0.0 {
        return Err("Fluctuation band must be a finite, non-negative number");
    }
    Ok(())
}

/// Validate the heat-sample jitter radius (degrees)
pub fn validate_jitter_radius(radius: f64) -> Result<(), &'static str> {
    if !radius.is_finite() || radius < 0.0 {
        return Err("Jitter radius must be a finite, non-negative number");
    }
    if radius > 5.0 {
        return Err("Jitter radius must not exceed 5 degrees");
    }
    Ok(())
}

/// Validate a heat-sample budget against `max`
pub fn validate_sample_budget(count: usize, max: usize) -> Result<(), &'static str> {
    if count > max {
        return Err("Heat-sample budget exceeds the configured maximum");
    }
    Ok(())
}

// ============================================================================
// Geographic Validations
// ============================================================================

/// Check whether a point falls inside Peru's approximate bounding box
pub fn is_in_peru(latitude: f64, longitude: f64) -> bool {
    (-18.4..=0.0).contains(&latitude) && (-81.4..=-68.6).contains(&longitude)
}
