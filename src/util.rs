use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch; a clock set before 1970 reads as zero.
pub fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Treat `None` and empty strings alike as "not provided".
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Display value for an optional field, `N/D` when not provided.
pub fn or_nd(value: &Option<String>) -> &str {
    present(value).unwrap_or("N/D")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_filters_empty_strings() {
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("Ana".to_string())), Some("Ana"));
        assert_eq!(or_nd(&Some(String::new())), "N/D");
    }
}
