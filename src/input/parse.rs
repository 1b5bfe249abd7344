// 입력 한 줄을 값으로 바꾸는 파서들. 실패하면 항상 AppErr::Validation.

use crate::error::{AppErr, Result};
use crate::var_char::VarChar;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn integer(line: &str) -> Result<i64> {
    let line = line.trim();
    line.parse::<i64>()
        .map_err(|_| AppErr::Validation(format!("'{line}' is not a whole number")))
}

pub fn non_negative(line: &str) -> Result<i64> {
    let n = integer(line)?;
    if n < 0 {
        return Err(AppErr::Validation("entry must not be negative".to_string()));
    }
    Ok(n)
}

/// Inclusive on both ends.
pub fn in_range(lo: i64, hi: i64) -> impl Fn(&str) -> Result<i64> {
    move |line| {
        let n = integer(line)?;
        if n < lo || n > hi {
            return Err(AppErr::Validation(format!(
                "entry must be between {lo} and {hi}"
            )));
        }
        Ok(n)
    }
}

pub fn date(format: &str) -> impl Fn(&str) -> Result<NaiveDate> + '_ {
    move |line| {
        let line = line.trim();
        NaiveDate::parse_from_str(line, format)
            .map_err(|_| AppErr::Validation(format!("'{line}' is not a valid date ({format})")))
    }
}

pub fn text<const CAP: usize>(line: &str) -> Result<VarChar<CAP>> {
    VarChar::try_from(line).map_err(|e| AppErr::Validation(e.to_string()))
}

/// A blank line becomes `None`, anything else goes through `parse`.
pub fn optional<T>(parse: impl Fn(&str) -> Result<T>) -> impl Fn(&str) -> Result<Option<T>> {
    move |line| {
        if line.trim().is_empty() {
            Ok(None)
        } else {
            parse(line).map(Some)
        }
    }
}
