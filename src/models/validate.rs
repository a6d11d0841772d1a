//! Field rules shared by create payloads and PATCH payloads.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::sql::SqlValue;

pub const HANDLE_MAX_LEN: usize = 25;

pub fn check_handle(handle: &str) -> Result<(), String> {
    if handle.is_empty() || handle.len() > HANDLE_MAX_LEN {
        return Err(format!("must be 1 to {} characters", HANDLE_MAX_LEN));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("may only use lowercase letters, digits and '-'".to_string());
    }
    Ok(())
}

pub fn check_non_empty(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(())
}

pub fn check_non_negative(value: i32) -> Result<(), String> {
    if value < 0 {
        return Err("must be greater than or equal to 0".to_string());
    }
    Ok(())
}

pub fn check_url(value: &str) -> Result<(), String> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| format!("is not a valid URL: {}", e))
}

pub fn check_equity(value: &Decimal) -> Result<(), String> {
    if value.is_sign_negative() || *value > Decimal::ONE {
        return Err("must be between 0 and 1".to_string());
    }
    Ok(())
}

fn expected(kind: &str, nullable: bool) -> String {
    if nullable {
        format!("must be {} or null", kind)
    } else {
        format!("must be {}", kind)
    }
}

pub fn text(value: &Value, nullable: bool) -> Result<SqlValue, String> {
    match value {
        Value::String(s) => Ok(SqlValue::from(s.clone())),
        Value::Null if nullable => Ok(SqlValue::Text(None)),
        _ => Err(expected("a string", nullable)),
    }
}

pub fn integer(value: &Value, nullable: bool) -> Result<SqlValue, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(SqlValue::from)
            .ok_or_else(|| "must be a 32-bit integer".to_string()),
        Value::Null if nullable => Ok(SqlValue::Int(None)),
        _ => Err(expected("an integer", nullable)),
    }
}

/// Accepts both `"0.25"` and `0.25`
pub fn decimal(value: &Value, nullable: bool) -> Result<SqlValue, String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null if nullable => return Ok(SqlValue::Decimal(None)),
        _ => return Err(expected("a decimal number", nullable)),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(SqlValue::from)
        .map_err(|_| format!("'{}' is not a decimal number", raw))
}
