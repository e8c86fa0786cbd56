//! # Field Validation
//!
//! Basic presence and format checks for customer fields. The operator form runs these
//! before submitting, and the API repeats them so a request that bypasses the form cannot
//! store malformed values.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{CustomerPatch, CustomerUpdate, NewCustomer};

/// Minimum number of characters in a customer name.
pub const NAME_MIN_LENGTH: usize = 2;

/// Field name (as sent on the wire) to a human-readable problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// JSON object suitable for the `details` of a validation error.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(field, message)| (field.to_string(), Value::String(message.clone())))
                .collect(),
        )
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9+\-\s]+$").expect("phone pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
    })
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }
    if trimmed.chars().count() < NAME_MIN_LENGTH {
        return Err(format!(
            "Name must be at least {} characters",
            NAME_MIN_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), String> {
    if address.trim().is_empty() {
        return Err("Address is required".to_string());
    }
    Ok(())
}

pub fn validate_phone_no(phone_no: &str) -> Result<(), String> {
    if phone_no.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    if !phone_pattern().is_match(phone_no) {
        return Err("Phone number may only contain digits, '+', '-' and spaces".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required".to_string());
    }
    if !email_pattern().is_match(trimmed) {
        return Err("Email must be a valid email address".to_string());
    }
    Ok(())
}

/// Types whose fields can be checked before they reach storage.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_name(&self.name));
        errors.check("address", validate_address(&self.address));
        errors.check("phoneNo", validate_phone_no(&self.phone_no));
        errors.check("email", validate_email(&self.email));
        errors.into_result()
    }
}

impl Validate for CustomerUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_name(&self.name));
        errors.check("address", validate_address(&self.address));
        errors.check("phoneNo", validate_phone_no(&self.phone_no));
        errors.check("email", validate_email(&self.email));
        errors.into_result()
    }
}

impl Validate for CustomerPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check("name", validate_name(name));
        }
        if let Some(address) = &self.address {
            errors.check("address", validate_address(address));
        }
        if let Some(phone_no) = &self.phone_no {
            errors.check("phoneNo", validate_phone_no(phone_no));
        }
        if let Some(email) = &self.email {
            errors.check("email", validate_email(email));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_customer() -> NewCustomer {
        NewCustomer {
            name: "Ann Lee".to_string(),
            address: "1 Main St".to_string(),
            phone_no: "555-1234".to_string(),
            email: "ann@example.com".to_string(),
            verification_status: None,
        }
    }

    #[test]
    fn test_valid_customer_passes() {
        assert!(valid_new_customer().validate().is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name("  A  ").is_err());
        assert_eq!(validate_name("   "), Err("Name is required".to_string()));
    }

    #[test]
    fn test_phone_pattern() {
        assert!(validate_phone_no("+1 555-1234").is_ok());
        assert!(validate_phone_no("0123456789").is_ok());
        assert!(validate_phone_no("555-CALL").is_err());
        assert!(validate_phone_no("(555) 1234").is_err());
        assert!(validate_phone_no("").is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("ann@example.com").is_ok());
        assert!(validate_email("first.last@sub.example.co").is_ok());
        assert!(validate_email("ann@example").is_err());
        assert!(validate_email("ann example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ann@.com").is_err());
    }

    #[test]
    fn test_all_field_errors_reported_together() {
        let errors = NewCustomer::default().validate().unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert!(errors.get("phoneNo").is_some());
        assert_eq!(errors.to_json()["address"], "Address is required");
    }

    #[test]
    fn test_patch_checks_only_present_fields() {
        let patch = CustomerPatch {
            address: Some("X".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = CustomerPatch {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("email").is_some());
    }
}
