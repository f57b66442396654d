// Display formatting shared by the chart engine and the GUI.
use chrono::NaiveDateTime;

/// Tooltip timestamp, e.g. "Jul 18, 2025 09:15:00".
pub fn format_tooltip_time(ts: &NaiveDateTime) -> String {
    ts.format("%b %d, %Y %H:%M:%S").to_string()
}

/// Formats a price with a fixed number of decimals.
pub fn format_price(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}", value, decimals = decimals)
}

/// Picks how many decimals an axis label needs for a given tick step.
pub fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10() - 1e-9).ceil().clamp(0.0, 8.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_tooltip_time() {
        let ts = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap().and_hms_opt(9, 15, 0).unwrap();
        assert_eq!(format_tooltip_time(&ts), "Jul 18, 2025 09:15:00");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(103.456, 2), "103.46");
        assert_eq!(format_price(100.0, 0), "100");
    }

    #[test]
    fn test_decimals_for_step() {
        assert_eq!(decimals_for_step(5.0), 0);
        assert_eq!(decimals_for_step(0.5), 1);
        assert_eq!(decimals_for_step(0.05), 2);
    }
}
