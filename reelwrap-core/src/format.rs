//! Formatting helpers shared by the CLI renderers.

/// Hour-of-day range for display (e.g., "10pm–11pm").
pub fn hour_display(hour: u32) -> String {
    let hour = hour % 24;
    let fmt = |h: u32| -> String {
        match h {
            0 => "12am".to_string(),
            1..=11 => format!("{}am", h),
            12 => "12pm".to_string(),
            _ => format!("{}pm", h - 12),
        }
    };
    format!("{}–{}", fmt(hour), fmt((hour + 1) % 24))
}

/// Minutes as hours and minutes (e.g., "3h 05m").
pub fn minutes_display(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Fraction as a whole percentage (e.g., 0.667 -> "67%").
pub fn percent_display(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_display() {
        assert_eq!(hour_display(0), "12am–1am");
        assert_eq!(hour_display(11), "11am–12pm");
        assert_eq!(hour_display(22), "10pm–11pm");
        assert_eq!(hour_display(23), "11pm–12am");
    }

    #[test]
    fn test_minutes_display() {
        assert_eq!(minutes_display(45), "45m");
        assert_eq!(minutes_display(185), "3h 05m");
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(percent_display(0.667), "67%");
        assert_eq!(percent_display(0.0), "0%");
    }
}
