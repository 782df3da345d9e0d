//! Month-name tables for trend labels.

use reportes_core::model::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const ES_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Language of month labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    En,
    Es,
}

impl MonthLocale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Name of `month` (1-12). Out-of-range months render as their number.
    #[must_use]
    pub fn month_name(self, month: u32) -> String {
        let table = match self {
            Self::En => &EN_MONTHS,
            Self::Es => &ES_MONTHS,
        };
        usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|idx| table.get(idx))
            .map_or_else(|| format!("{month:02}"), |name| (*name).to_string())
    }

    /// `"<Month> <year>"`, e.g. `March 2024`.
    #[must_use]
    pub fn label(self, year: i32, month: u32) -> String {
        format!("{} {year}", self.month_name(month))
    }
}

impl fmt::Display for MonthLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonthLocale {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "es" | "spanish" | "español" => Ok(Self::Es),
            _ => Err(ParseEnumError {
                expected: "locale",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_per_locale() {
        assert_eq!(MonthLocale::En.label(2024, 3), "March 2024");
        assert_eq!(MonthLocale::Es.label(2024, 12), "Diciembre 2024");
    }

    #[test]
    fn out_of_range_month_is_numeric() {
        assert_eq!(MonthLocale::En.month_name(0), "00");
        assert_eq!(MonthLocale::Es.month_name(13), "13");
    }

    #[test]
    fn parse_locale() {
        assert_eq!("ES".parse::<MonthLocale>(), Ok(MonthLocale::Es));
        assert_eq!("english".parse::<MonthLocale>(), Ok(MonthLocale::En));
        assert!("fr".parse::<MonthLocale>().is_err());
    }
}
