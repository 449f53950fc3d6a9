use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::{ROLE_CONTRIBUTOR, ROLE_MODERATOR};

lazy_static! {
    /// Regex for validating session user ids
    /// Must be 1-64 characters of ASCII letters, digits, underscores or hyphens
    /// - Valid: "demo-user", "user1", "moderator_02"
    /// - Invalid: "", "user 1", "user@example", "ünïcode"
    pub static ref USER_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

/// Rejects empty and whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Only roles the map knows about may be claimed at login
pub fn validate_roles(roles: &[String]) -> Result<(), ValidationError> {
    for role in roles {
        if role != ROLE_MODERATOR && role != ROLE_CONTRIBUTOR {
            let mut error = ValidationError::new("unknown_role");
            error.message = Some(format!("Unknown role '{}'", role).into());
            return Err(error);
        }
    }
    Ok(())
}
