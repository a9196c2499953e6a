use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::AppError;

pub const EVENT_TYPES: [&str; 5] = ["wedding", "corporate", "birthday", "festival", "other"];
pub const INQUIRY_STATUSES: [&str; 5] = ["pending", "contacted", "quoted", "confirmed", "cancelled"];
pub const USER_STATUSES: [&str; 3] = ["active", "inactive", "pending"];
pub const SELF_SERVICE_ROLES: [&str; 2] = ["customer", "caterer"];
pub const MIN_PASSWORD_LEN: usize = 8;

fn bad(msg: impl Into<String>) -> AppError {
    AppError::BadRequest(msg.into())
}

pub fn non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn positive_price(price: Decimal) -> Result<Decimal, AppError> {
    if price <= Decimal::ZERO {
        return Err(bad("Price must be greater than 0"));
    }
    Ok(crate::domain::money::round_price(price))
}

pub fn menu_date_not_past(menu_date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if menu_date < today {
        return Err(bad("Menu date cannot be in the past"));
    }
    Ok(())
}

/// Lower-cased email with a local part, an `@` and a dotted domain.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = email.len() >= 5
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .rsplit_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
            }
            None => false,
        };
    if !valid {
        return Err(bad("Invalid email format"));
    }
    Ok(email)
}

pub fn registration_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(bad(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn registration_role(role: &str) -> Result<String, AppError> {
    let role = role.trim().to_lowercase();
    if !SELF_SERVICE_ROLES.contains(&role.as_str()) {
        return Err(bad(format!(
            "Role must be one of: {}",
            SELF_SERVICE_ROLES.join(", ")
        )));
    }
    Ok(role)
}

pub fn user_status(status: &str) -> Result<String, AppError> {
    if !USER_STATUSES.contains(&status) {
        return Err(bad("Invalid status"));
    }
    Ok(status.to_string())
}

pub fn review_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(bad("Name must be at least 2 characters"));
    }
    Ok(name.to_string())
}

pub fn review_text(text: &str) -> Result<String, AppError> {
    let text = text.trim();
    if text.chars().count() < 10 {
        return Err(bad("Review must be at least 10 characters"));
    }
    Ok(text.to_string())
}

pub fn review_rating(rating: i32) -> Result<i32, AppError> {
    if !(1..=5).contains(&rating) {
        return Err(bad("Rating must be between 1 and 5"));
    }
    Ok(rating)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; the day must be after `today`.
pub fn event_date(raw: &str, today: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| bad("Invalid date format. Use YYYY-MM-DD or ISO format."))?;

    if parsed.date_naive() <= today {
        return Err(bad("Event date must be in the future"));
    }
    Ok(parsed)
}

pub fn event_type(raw: &str) -> Result<String, AppError> {
    let lowered = raw.trim().to_lowercase();
    if !EVENT_TYPES.contains(&lowered.as_str()) {
        return Err(bad(format!(
            "Event type must be one of: {}",
            EVENT_TYPES.join(", ")
        )));
    }
    Ok(lowered)
}

pub fn guest_count(count: i32) -> Result<i32, AppError> {
    if count < 1 {
        return Err(bad("Guest count must be at least 1"));
    }
    Ok(count)
}

pub fn phone_number(phone: &str) -> Result<String, AppError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(bad("Phone number must contain at least 10 digits"));
    }
    Ok(phone.trim().to_string())
}

pub fn inquiry_status(status: &str) -> Result<String, AppError> {
    if !INQUIRY_STATUSES.contains(&status) {
        return Err(bad(format!(
            "Status must be one of: {}",
            INQUIRY_STATUSES.join(", ")
        )));
    }
    Ok(status.to_string())
}
