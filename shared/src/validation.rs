//! Input validation functions
//!
//! Validation utilities shared between the API layer and the services.

use rust_decimal::Decimal;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Plan durations are capped at five years
pub const MAX_DURATION_MONTHS: i32 = 60;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a client or plan display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.len() > 120 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate a plan or transaction currency amount
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount.is_sign_negative() {
        return Err("Amount cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a plan duration in months
pub fn validate_duration_months(months: i32) -> Result<(), String> {
    if months <= 0 {
        return Err("Duration must be at least 1 month".to_string());
    }
    if months > MAX_DURATION_MONTHS {
        return Err(format!(
            "Duration cannot exceed {} months",
            MAX_DURATION_MONTHS
        ));
    }
    Ok(())
}

/// Validate body weight (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}
