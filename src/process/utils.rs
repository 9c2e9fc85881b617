use anyhow::{anyhow, Result};

/// Width of a census block geocode.
pub const BLOCK_WIDTH: usize = 15;
/// Width of a census tract geocode; also the block prefix naming its tract.
pub const TRACT_WIDTH: usize = 11;

/// Trim whitespace and strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Geocodes can come through as wide integers: a trailing `.0`, or lost
/// leading zeros. Restore the fixed-width zero-padded form.
pub fn normalize_geocode(raw: &str, width: usize) -> String {
    let s = clean_str(raw);
    let s = s.strip_suffix(".0").unwrap_or(s);
    if s.len() < width && s.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:0>width$}", s, width = width)
    } else {
        s.to_string()
    }
}

/// Containing tract of a geocode. Anything longer than a tract id is read as
/// a block.
pub fn tract_of(geocode: &str) -> String {
    let cleaned = clean_str(geocode);
    let cleaned = cleaned.strip_suffix(".0").unwrap_or(cleaned);
    if cleaned.len() <= TRACT_WIDTH {
        return normalize_geocode(cleaned, TRACT_WIDTH);
    }
    normalize_geocode(cleaned, BLOCK_WIDTH)
        .chars()
        .take(TRACT_WIDTH)
        .collect()
}

/// Parse a count cell. Empty cells count as zero.
pub fn parse_count(raw: &str) -> Result<i64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return Ok(0);
    }
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        _ => Err(anyhow!("not an integer count: {:?}", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocodes_are_zero_padded() {
        assert_eq!(normalize_geocode("10010201001000", 15), "010010201001000");
        assert_eq!(normalize_geocode("421010001001000.0", 15), "421010001001000");
        assert_eq!(normalize_geocode(" \"42101000100\" ", 11), "42101000100");
        assert_eq!(normalize_geocode("nan", 11), "nan");
    }

    #[test]
    fn tract_is_first_eleven_characters() {
        assert_eq!(tract_of("421010001001000"), "42101000100");
        assert_eq!(tract_of("10010201001000"), "01001020100");
        assert_eq!(tract_of("42101000100"), "42101000100");
    }

    #[test]
    fn counts_parse() {
        assert_eq!(parse_count("12").unwrap(), 12);
        assert_eq!(parse_count("").unwrap(), 0);
        assert_eq!(parse_count("7.0").unwrap(), 7);
        assert!(parse_count("7.5").is_err());
        assert!(parse_count("abc").is_err());
    }
}
