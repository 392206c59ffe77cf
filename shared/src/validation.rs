//! Validation utilities for the AgroSat Monitor platform

use rust_decimal::Decimal;

// ============================================================================
// Satellite Index Validations
// ============================================================================

/// Validate a normalized index (NDVI/NDWI) is within −1..1
pub fn validate_normalized_index(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Index value must be a finite number");
    }
    if !(-1.0..=1.0).contains(&value) {
        return Err("Index value must be between -1 and 1");
    }
    Ok(())
}

/// Validate a fraction (cloud cover) is within 0..1
pub fn validate_fraction(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Fraction must be a finite number");
    }
    if !(0.0..=1.0).contains(&value) {
        return Err("Fraction must be between 0 and 1");
    }
    Ok(())
}

/// Validate a surface temperature is physically plausible (°C)
pub fn validate_surface_temperature(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Temperature must be a finite number");
    }
    if !(-60.0..=70.0).contains(&value) {
        return Err("Temperature out of plausible surface range");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate GPS coordinates are within valid degree ranges
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}
