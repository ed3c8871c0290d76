//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate account password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a nickname shown to other participants
pub fn validate_nickname(nickname: &str) -> Result<(), String> {
    let len = nickname.chars().count();
    if len < 2 {
        return Err("Nickname must be at least 2 characters".to_string());
    }
    if len > 20 {
        return Err("Nickname must be at most 20 characters".to_string());
    }
    if nickname.trim() != nickname {
        return Err("Nickname cannot start or end with whitespace".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
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

// ============================================================================
// Battle Room Validation
// ============================================================================

/// Validate a battle room name
pub fn validate_room_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if name.trim().is_empty() {
        return Err("Room name cannot be empty".to_string());
    }
    if len > 30 {
        return Err("Room name must be at most 30 characters".to_string());
    }
    Ok(())
}

/// Validate a battle room description
pub fn validate_room_description(description: &str) -> Result<(), String> {
    if description.chars().count() > 200 {
        return Err("Room description must be at most 200 characters".to_string());
    }
    Ok(())
}

/// Validate the shared room password.
///
/// Looser than the account password: this is a join gate, not a credential.
pub fn validate_room_password(password: &str) -> Result<(), String> {
    if password.len() < 4 {
        return Err("Room password must be at least 4 characters".to_string());
    }
    if password.len() > 64 {
        return Err("Room password must be at most 64 characters".to_string());
    }
    Ok(())
}

/// Validate room capacity (battles run with 2-4 people)
pub fn validate_max_participants(max: i32) -> Result<(), String> {
    if !(2..=4).contains(&max) {
        return Err("Max participants must be between 2 and 4".to_string());
    }
    Ok(())
}

/// Validate battle duration in days
pub fn validate_duration_days(days: i32) -> Result<(), String> {
    if days < 1 {
        return Err("Duration must be at least 1 day".to_string());
    }
    if days > 365 {
        return Err("Duration must be at most 365 days".to_string());
    }
    Ok(())
}

// ============================================================================
// Goal Validation
// ============================================================================

/// Validate a goal title
pub fn validate_goal_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Goal title cannot be empty".to_string());
    }
    if title.chars().count() > 50 {
        return Err("Goal title must be at most 50 characters".to_string());
    }
    Ok(())
}

/// Validate a goal window in hours (weekly preset = 168, monthly = 720)
pub fn validate_duration_hours(hours: i64) -> Result<(), String> {
    if hours < 1 {
        return Err("Duration must be at least 1 hour".to_string());
    }
    if hours > 8760 {
        return Err("Duration must be at most one year".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("no-at-sign.example.com", false)]
    #[case("", false)]
    #[case("spaced user@example.com", false)]
    fn test_validate_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[rstest]
    #[case(20.0, true)]
    #[case(500.0, true)]
    #[case(19.9, false)]
    #[case(500.1, false)]
    #[case(f64::NAN, false)]
    fn test_validate_weight(#[case] weight: f64, #[case] ok: bool) {
        assert_eq!(validate_weight(weight).is_ok(), ok);
    }

    #[rstest]
    #[case(1, false)]
    #[case(2, true)]
    #[case(4, true)]
    #[case(5, false)]
    fn test_validate_max_participants(#[case] max: i32, #[case] ok: bool) {
        assert_eq!(validate_max_participants(max).is_ok(), ok);
    }

    #[test]
    fn test_room_password_too_short() {
        assert!(validate_room_password("abc").is_err());
        assert!(validate_room_password("abcd").is_ok());
    }

    #[test]
    fn test_room_name_bounds() {
        assert!(validate_room_name("").is_err());
        assert!(validate_room_name("   ").is_err());
        assert!(validate_room_name("summer shred").is_ok());
        assert!(validate_room_name(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_nickname_bounds() {
        assert!(validate_nickname("a").is_err());
        assert!(validate_nickname("jo").is_ok());
        assert!(validate_nickname(" pad ").is_err());
        assert!(validate_nickname(&"x".repeat(21)).is_err());
    }

    #[test]
    fn test_duration_presets_are_valid() {
        // Weekly and monthly presets
        assert!(validate_duration_hours(168).is_ok());
        assert!(validate_duration_hours(720).is_ok());
        assert!(validate_duration_hours(0).is_err());
        assert!(validate_duration_hours(9000).is_err());
    }
}
