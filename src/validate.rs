use chrono::NaiveDate;

pub const TITLE_MIN_CHARS: usize = 3;

pub const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters";
pub const DEADLINE_IN_PAST: &str = "Deadline cannot be in the past";
pub const DEADLINE_NOT_A_DATE: &str = "Deadline must be a date (YYYY-MM-DD)";

/// Validate a task title: at least [`TITLE_MIN_CHARS`] characters, untrimmed.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.chars().count() < TITLE_MIN_CHARS {
        return Err(TITLE_TOO_SHORT.to_string());
    }
    Ok(())
}

/// Validate an optional deadline entered as text.
/// Empty text means no deadline. Comparison is at day granularity, so `today` passes.
pub fn validate_deadline(text: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| DEADLINE_NOT_A_DATE.to_string())?;
    if date < today {
        return Err(DEADLINE_IN_PAST.to_string());
    }
    Ok(Some(date))
}
