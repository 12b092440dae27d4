/// Render seconds as `M:SS`, minutes unpadded.
///
/// ```
/// use routinely_core::timer::format_time;
/// assert_eq!(format_time(605), "10:05");
/// assert_eq!(format_time(5), "0:05");
/// ```
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(7260), "121:00");
    }
}
