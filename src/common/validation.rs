// src/common/validation.rs

use chrono::NaiveDate;
use validator::ValidationError;

/// Interpreta uma data de visita em um dos dois formatos aceitos:
/// `YYYY-MM-DD` (canônico) ou `DD/MM/YYYY` (legado).
pub fn parse_visit_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let format = match (bytes[2], bytes[4], bytes[5], bytes[7]) {
        (_, b'-', _, b'-') => "%Y-%m-%d",
        (b'/', _, b'/', _) => "%d/%m/%Y",
        _ => return None,
    };

    NaiveDate::parse_from_str(value, format).ok()
}

pub fn validate_visit_date(value: &str) -> Result<(), ValidationError> {
    match parse_visit_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_date")),
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
