//! Free-text duration entry.
//!
//! Accepts `H:MM:SS`, `MM:SS`, or a bare number of minutes. Commas count as
//! colons and all whitespace is ignored, so `"1, 30"` reads as `1:30`.

use crate::error::TimeInputError;

/// Parse a duration typed by the user into milliseconds.
///
/// A rejected input must not change the timer; the caller reports the error.
///
/// # Errors
/// Returns a [`TimeInputError`] describing the first problem found.
pub fn parse_time_input(raw: &str) -> Result<u64, TimeInputError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { ':' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err(TimeInputError::Empty);
    }

    let raw_parts: Vec<&str> = cleaned.split(':').collect();
    if raw_parts.len() > 3 {
        return Err(TimeInputError::TooManyParts(raw_parts.len()));
    }
    let parts = raw_parts
        .into_iter()
        .map(parse_component)
        .collect::<Result<Vec<u64>, _>>()?;

    let seconds = match parts.as_slice() {
        [minutes] => minutes.checked_mul(60),
        [minutes, seconds] => {
            below_sixty("seconds", *seconds)?;
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(*seconds))
        }
        [hours, minutes, seconds] => {
            below_sixty("minutes", *minutes)?;
            below_sixty("seconds", *seconds)?;
            hours
                .checked_mul(3600)
                .and_then(|h| h.checked_add(minutes * 60))
                .and_then(|hm| hm.checked_add(*seconds))
        }
        _ => return Err(TimeInputError::TooManyParts(parts.len())),
    };

    seconds
        .and_then(|s| s.checked_mul(1000))
        .ok_or(TimeInputError::Overflow)
}

fn parse_component(part: &str) -> Result<u64, TimeInputError> {
    if let Some(rest) = part.strip_prefix('-') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(TimeInputError::Negative(part.to_string()));
        }
    }
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimeInputError::NotANumber(part.to_string()));
    }
    part.parse::<u64>().map_err(|_| TimeInputError::Overflow)
}

fn below_sixty(unit: &'static str, value: u64) -> Result<(), TimeInputError> {
    if value >= 60 {
        Err(TimeInputError::OutOfRange { unit, value })
    } else {
        Ok(())
    }
}
