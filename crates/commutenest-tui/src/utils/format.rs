/// Format a dollar amount with thousands separators: 2600 -> "$2,600"
pub fn format_currency(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

/// Format a budget range, whichever ends of it are set
pub fn format_budget(min: Option<u32>, max: Option<u32>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("{} - {}", format_currency(min), format_currency(max))),
        (Some(min), None) => Some(format!("from {}", format_currency(min))),
        (None, Some(max)) => Some(format!("up to {}", format_currency(max))),
        (None, None) => None,
    }
}

/// Format a commute limit in minutes: 90 -> "1h 30m"
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Format coordinates to 4 decimal places (about 10 meters)
pub fn format_coordinates(lat: f64, lng: f64) -> String {
    format!("{:.4}, {:.4}", lat, lng)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(950), "$950");
        assert_eq!(format_currency(2600), "$2,600");
        assert_eq!(format_currency(1250000), "$1,250,000");
    }

    #[test]
    fn test_format_budget() {
        assert_eq!(format_budget(Some(1800), Some(2600)).as_deref(), Some("$1,800 - $2,600"));
        assert_eq!(format_budget(None, Some(2600)).as_deref(), Some("up to $2,600"));
        assert_eq!(format_budget(Some(1800), None).as_deref(), Some("from $1,800"));
        assert_eq!(format_budget(None, None), None);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(35), "35 min");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
