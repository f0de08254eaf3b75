pub fn truncate_utf8_prefix(value: &str, max_bytes: usize) -> String {
    if max_bytes == 0 {
        return String::new();
    }
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// First `max_chars` characters of `value`; shorter input comes back whole.
pub fn take_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
