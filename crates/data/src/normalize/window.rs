//! Subscription window text → (start, end).
//!
//! Used only when the table has no usable discrete start/end columns, e.g.
//! a single "招股日期" column holding "2024年1月5日 - 2024年1月20日".

use crate::normalize::scalar::{fold_fullwidth_digits, is_emptyish, parse_date_text};
use chrono::NaiveDate;
use hk_ipo_core::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

static WINDOW_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})[^0-9]{0,3}([0-9]{1,2})[^0-9]{0,3}([0-9]{1,2})")
        .expect("window date regex")
});

/// Scans free text for date triples; the first two found become start and end.
///
/// One triple yields `(start, None)`; none yields `(None, None)`.
#[must_use]
pub fn parse_window(value: Option<&CellValue>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    if is_emptyish(value) {
        return (None, None);
    }
    let Some(value) = value else {
        return (None, None);
    };
    parse_window_text(&value.to_string())
}

/// Text-only half of [`parse_window`].
#[must_use]
pub fn parse_window_text(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let text = fold_fullwidth_digits(text);
    let mut dates = WINDOW_DATE
        .captures_iter(&text)
        .take(2)
        .map(|caps| parse_date_text(&format!("{}-{}-{}", &caps[1], &caps[2], &caps[3])));

    let start = dates.next().flatten();
    let end = dates.next().flatten();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_window_with_two_dates() {
        assert_eq!(
            parse_window_text("2024年1月5日 - 2024年1月20日"),
            (date(2024, 1, 5), date(2024, 1, 20))
        );
        assert_eq!(
            parse_window_text("2024-01-05至2024-01-10"),
            (date(2024, 1, 5), date(2024, 1, 10))
        );
    }

    #[test]
    fn test_window_with_single_date() {
        assert_eq!(parse_window_text("2024年1月5日"), (date(2024, 1, 5), None));
    }

    #[test]
    fn test_window_without_dates() {
        assert_eq!(parse_window_text("待定"), (None, None));
        assert_eq!(parse_window(None), (None, None));
        assert_eq!(parse_window(Some(&CellValue::Null)), (None, None));
    }

    #[test]
    fn test_window_extra_dates_ignored() {
        assert_eq!(
            parse_window_text("2024/1/5, 2024/1/8, 2024/1/12"),
            (date(2024, 1, 5), date(2024, 1, 8))
        );
    }

    #[test]
    fn test_window_invalid_side_is_none() {
        assert_eq!(
            parse_window_text("2024年2月30日 - 2024年3月2日"),
            (None, date(2024, 3, 2))
        );
    }

    #[test]
    fn test_window_fullwidth_digits() {
        assert_eq!(
            parse_window_text("2024年１月５日 - 2024年１月２０日"),
            (date(2024, 1, 5), date(2024, 1, 20))
        );
    }

    #[test]
    fn test_window_compact_digits() {
        assert_eq!(
            parse_window(Some(&CellValue::Text("20240105-20240120".to_string()))),
            (date(2024, 1, 5), date(2024, 1, 20))
        );
    }
}
