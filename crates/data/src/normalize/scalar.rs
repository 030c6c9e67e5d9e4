//! Single-cell normalization: emptiness, display text, and calendar dates.

use chrono::NaiveDate;
use hk_ipo_core::CellValue;
use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::Regex;

/// Literal date layouts tried in order before falling back to a text scan.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

/// Text the provider uses for "no value".
const EMPTY_TOKENS: [&str; 4] = ["", "nan", "NaT", "None"];

static EMBEDDED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})[^0-9]+([0-9]{1,2})[^0-9]+([0-9]{1,2})").expect("embedded date regex")
});

/// True for absent cells, NaN, provider null sentinels, and the
/// literal tokens `""`, `"nan"`, `"NaT"`, `"None"` after trimming.
#[must_use]
pub fn is_emptyish(value: Option<&CellValue>) -> bool {
    match value {
        None | Some(CellValue::Null) => true,
        Some(CellValue::Float(f)) if f.is_nan() => true,
        Some(other) => EMPTY_TOKENS.contains(&other.to_string().trim()),
    }
}

/// Display string for a cell: empty when emptyish, `YYYY-MM-DD` for dates
/// and date-times, otherwise the trimmed text form.
#[must_use]
pub fn to_display_string(value: Option<&CellValue>) -> String {
    if is_emptyish(value) {
        return String::new();
    }
    match value {
        Some(CellValue::Date(d)) => format_date(Some(*d)),
        Some(CellValue::DateTime(dt)) => format_date(Some(dt.date())),
        Some(other) => other.to_string().trim().to_string(),
        None => String::new(),
    }
}

/// Extracts a calendar date from a cell.
///
/// Date and date-time cells are used directly. Text is tried against the
/// literal layouts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, `YYYYMMDD`,
/// then scanned for the first `year <sep> month <sep> day` run. Values that
/// do not form a real calendar date yield `None`.
#[must_use]
pub fn to_date(value: Option<&CellValue>) -> Option<NaiveDate> {
    if is_emptyish(value) {
        return None;
    }
    match value? {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        other => parse_date_text(other.to_string().trim()),
    }
}

/// Text-only half of [`to_date`].
///
/// Literal layouts are only tried when the text starts with a digit, so a
/// signed year such as `-2024-01-05` goes to the embedded scan instead.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = fold_fullwidth_digits(text);
    let text = text.trim();

    if text.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        {
            return Some(date);
        }
    }

    let caps = EMBEDDED_DATE.captures(text)?;
    ymd(&caps[1], &caps[2], &caps[3])
}

/// Rewrites full-width digits (`０`..`９`) as ASCII. Borrows when there are none.
#[must_use]
pub fn fold_fullwidth_digits(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_fullwidth_digit) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| {
                if is_fullwidth_digit(c) {
                    char::from(b'0' + (c as u32 - 0xFF10) as u8)
                } else {
                    c
                }
            })
            .collect(),
    )
}

fn is_fullwidth_digit(c: char) -> bool {
    ('\u{FF10}'..='\u{FF19}').contains(&c)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// `YYYY-MM-DD`, or empty for no date.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
