//! Two-digit month codes ("01".."12") used by the acquisition and
//! maintenance month filters.

use crate::Timestamp;
use chrono::Datelike;

/// All month codes in calendar order.
pub const MONTH_CODES: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

const MONTH_LABELS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// 1-indexed, zero-padded month of a timestamp, in UTC.
pub fn month_code(ts: &Timestamp) -> String {
    format!("{:02}", ts.month())
}

/// Four-digit year of a timestamp, in UTC.
pub fn year_code(ts: &Timestamp) -> String {
    format!("{:04}", ts.year())
}

/// Display name for a month code, or `None` for anything outside "01".."12".
pub fn month_label(code: &str) -> Option<&'static str> {
    MONTH_CODES
        .iter()
        .position(|c| *c == code)
        .map(|idx| MONTH_LABELS[idx])
}

/// Slot index (0..12) of a month code.
pub(crate) fn month_index(code: &str) -> Option<usize> {
    MONTH_CODES.iter().position(|c| *c == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_month_code_is_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2023, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(month_code(&ts), "03");
        let ts = Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap();
        assert_eq!(month_code(&ts), "11");
    }

    #[test]
    fn test_year_code() {
        let ts = Utc.with_ymd_and_hms(2021, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(year_code(&ts), "2021");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("01"), Some("Janeiro"));
        assert_eq!(month_label("12"), Some("Dezembro"));
        assert_eq!(month_label("1"), None);
        assert_eq!(month_label("13"), None);
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index("01"), Some(0));
        assert_eq!(month_index("12"), Some(11));
        assert_eq!(month_index(""), None);
    }
}
