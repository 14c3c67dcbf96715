use crate::error::{internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses a Discord id from a raw snowflake or a user/channel/role mention.
///
/// Accepts `123`, `<@123>`, `<@!123>`, `<#123>` and `<@&123>`.
pub fn parse_snowflake(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches(['@', '#', '!', '&']))
        .unwrap_or(trimmed);

    inner.parse::<u64>().ok().filter(|id| *id > 0)
}

/// Parses a comma separated list of Discord ids, rejecting the whole list if any
/// entry is invalid.
pub fn parse_snowflake_list(input: &str) -> Option<Vec<u64>> {
    let mut ids = Vec::new();
    for part in input.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let id = parse_snowflake(part)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &value[..byte_index],
        None => value,
    }
}

/// Caps `value` at `max_chars`; a cut rendering ends in `"\n..."` and still fits.
pub fn truncate_with_marker(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    format!("{}\n...", truncate_chars(value, max_chars.saturating_sub(4)))
}
