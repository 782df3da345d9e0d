//! Tolerant parsing of ticket date strings.
//!
//! Stored dates come in several layouts. They are tried in a fixed order and
//! the first that yields a valid calendar date wins:
//!
//! | order | layout       | example      |
//! |-------|--------------|--------------|
//! | 1     | `dd/mm/yy`   | `05/03/24`   |
//! | 2     | `dd/mm/yyyy` | `05/03/2024` |
//! | 3     | `yyyy-mm-dd` | `2024-03-05` |
//! | 4     | `dd-mm-yyyy` | `05-03-2024` |
//! | 5     | `dd-mm-yy`   | `05-03-24`   |
//!
//! Two-digit years always land in 2000-2099.

use chrono::{Datelike, NaiveDate, Weekday};

/// A date string matched none of the accepted layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date: '{input}'")]
pub struct DateParseError {
    pub input: String,
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    DayMonthShortYear(char),
    DayMonthYear(char),
    YearMonthDay(char),
}

const LAYOUTS: [Layout; 5] = [
    Layout::DayMonthShortYear('/'),
    Layout::DayMonthYear('/'),
    Layout::YearMonthDay('-'),
    Layout::DayMonthYear('-'),
    Layout::DayMonthShortYear('-'),
];

impl Layout {
    fn parse(self, text: &str) -> Option<NaiveDate> {
        let (sep, day_idx, year_idx, year_digits) = match self {
            Self::DayMonthShortYear(sep) => (sep, 0, 2, 2),
            Self::DayMonthYear(sep) => (sep, 0, 2, 4),
            Self::YearMonthDay(sep) => (sep, 2, 0, 4),
        };

        let mut parts = text.split(sep);
        let fields = [parts.next()?, parts.next()?, parts.next()?];
        if parts.next().is_some() {
            return None;
        }

        let year_text = fields[year_idx];
        if year_text.len() != year_digits {
            return None;
        }
        let mut year = numeric_field(year_text, year_digits)?;
        if year_digits == 2 {
            year += 2000;
        }
        let month = numeric_field(fields[1], 2)?;
        let day = numeric_field(fields[day_idx], 2)?;

        NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )
    }
}

fn numeric_field(text: &str, max_digits: usize) -> Option<u64> {
    if text.is_empty() || text.len() > max_digits || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse `raw` using the first matching layout.
///
/// # Errors
///
/// Returns [`DateParseError`] when no layout produces a valid date.
pub fn parse_flexible(raw: &str) -> Result<NaiveDate, DateParseError> {
    let text = raw.trim();
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(text))
        .ok_or_else(|| DateParseError {
            input: raw.to_string(),
        })
}

/// Monday through Friday.
#[must_use]
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Canonical storage layout, `dd/mm/yy`.
#[must_use]
pub fn format_short(date: NaiveDate) -> String {
    date.format("%d/%m/%y").to_string()
}

/// Day label used by the daily trend, `dd/mm`.
#[must_use]
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}
