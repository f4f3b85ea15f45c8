//! Pay period handling.
//!
//! Salaries are keyed by a human readable period such as `"January 2025"`.
//! Clients written for the Indonesian office send `"Januari 2025"`, so both
//! vocabularies are accepted and the English form is stored.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

const ENGLISH: [&str; 12] = [
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

const INDONESIAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SalaryMonth {
    year: i32,
    /// 1-based.
    month: u32,
}

impl SalaryMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for SalaryMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ENGLISH[(self.month - 1) as usize], self.year)
    }
}

impl FromStr for SalaryMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            EngineError::Validation(format!(
                "invalid salary month \"{s}\", expected \"MonthName YYYY\""
            ))
        };

        let mut parts = s.split_whitespace();
        let name = parts.next().ok_or_else(invalid)?;
        let year = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let position = ENGLISH
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name))
            .or_else(|| INDONESIAN.iter().position(|m| m.eq_ignore_ascii_case(name)))
            .ok_or_else(invalid)?;
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Self::new(year, position as u32 + 1)
    }
}

impl Serialize for SalaryMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SalaryMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_indonesian_names() {
        let en: SalaryMonth = "January 2025".parse().unwrap();
        let id: SalaryMonth = "januari 2025".parse().unwrap();
        assert_eq!(en, id);
        assert_eq!(id.to_string(), "January 2025");

        let aug: SalaryMonth = "Agustus 2024".parse().unwrap();
        assert_eq!(aug.month(), 8);
        assert_eq!(aug.to_string(), "August 2024");
    }

    #[test]
    fn rejects_numeric_and_malformed_periods() {
        assert!("2025-01".parse::<SalaryMonth>().is_err());
        assert!("Jan 2025".parse::<SalaryMonth>().is_err());
        assert!("January".parse::<SalaryMonth>().is_err());
        assert!("January 25".parse::<SalaryMonth>().is_err());
        assert!("January 2025 extra".parse::<SalaryMonth>().is_err());
    }

    #[test]
    fn orders_chronologically() {
        let dec: SalaryMonth = "December 2024".parse().unwrap();
        let jan: SalaryMonth = "January 2025".parse().unwrap();
        assert!(dec < jan);
    }
}
