/// Reads the hero position from a location string such as `?image=3`.
///
/// The value is read like a lenient integer parse: leading whitespace and sign
/// are accepted, digits are read up to the first non-digit, and anything
/// unparsable becomes 0. The result is clamped into `[0, len - 1]`.
pub fn parse_image_param(location: &str, len: usize) -> usize {
    let query = location
        .split_once('?')
        .map_or(location, |(_, query)| query);
    let query = query.split('#').next().unwrap_or_default();
    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == "image")
        .map(|(_, value)| value)
        .unwrap_or_default();

    let value = leading_integer(raw).unwrap_or(0);
    let last = len.saturating_sub(1);
    if value <= 0 {
        return 0;
    }
    usize::try_from(value).map_or(last, |value| value.min(last))
}

pub fn format_location(position: usize) -> String {
    format!("?image={position}")
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
