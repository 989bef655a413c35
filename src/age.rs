//! Human-readable ages
//!
//! Turns a birth moment into a short age string such as `17 yrs, 1 mth` or
//! `3 days`. The precision depends on how old the person is:
//!
//! | Age              | Units             |
//! |------------------|-------------------|
//! | under 2 hours    | minutes           |
//! | under 2 days     | hours             |
//! | under 4 weeks    | days              |
//! | under 1 year     | weeks, days       |
//! | under 2 years    | months, days      |
//! | under 18 years   | years, months     |
//! | 18 years or more | years             |
//!
//! Rendering of individual units goes through [`UnitFormatter`], so callers
//! with their own localisation can plug it in.

use crate::error::{Error, Result};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// A calendar unit used in an age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
}

/// The units selected for an age, largest first
///
/// Holds one or two entries. Zero values are kept so the formatter can fall
/// back to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBreakdown {
    parts: Vec<(AgeUnit, i64)>,
}

impl AgeBreakdown {
    /// All selected units, including zero values
    pub fn parts(&self) -> &[(AgeUnit, i64)] {
        &self.parts
    }

    /// Value for a unit, if it was selected
    pub fn get(&self, unit: AgeUnit) -> Option<i64> {
        self.parts
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, v)| *v)
    }
}

/// Renders units for display
pub trait UnitFormatter {
    /// Render a single unit value, e.g. `2 yrs`
    fn format_unit(&self, unit: AgeUnit, value: i64) -> String;

    /// Join the larger and smaller rendered units
    fn join(&self, big: &str, small: &str) -> String {
        format!("{big}, {small}")
    }
}

/// Abbreviated English units (`yr`, `mth`, `wk`, `day`, `hr`, `min`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortEnglish;

impl UnitFormatter for ShortEnglish {
    fn format_unit(&self, unit: AgeUnit, value: i64) -> String {
        let plural = value != 1;
        let label = match unit {
            AgeUnit::Year if plural => "yrs",
            AgeUnit::Year => "yr",
            AgeUnit::Month if plural => "mths",
            AgeUnit::Month => "mth",
            AgeUnit::Week if plural => "wks",
            AgeUnit::Week => "wk",
            AgeUnit::Day if plural => "days",
            AgeUnit::Day => "day",
            AgeUnit::Hour => "hr",
            AgeUnit::Minute => "min",
        };
        format!("{value} {label}")
    }
}

/// Whole calendar months from `from` to `to`
fn months_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());

    if months > 0 {
        let anniversary = u32::try_from(months)
            .ok()
            .and_then(|m| from.checked_add_months(Months::new(m)));
        if anniversary.map_or(true, |a| a > to) {
            months -= 1;
        }
    }

    months.max(0)
}

fn sub_months(at: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    u32::try_from(months)
        .ok()
        .and_then(|m| at.checked_sub_months(Months::new(m)))
}

/// Select the units describing the age at `at` of someone born at `birth`
pub fn age_breakdown(birth: NaiveDateTime, at: NaiveDateTime) -> Result<AgeBreakdown> {
    if birth > at {
        return Err(Error::invalid_input(format!(
            "birth {birth} is after reference time {at}"
        )));
    }

    let elapsed = at - birth;
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();
    let weeks = days / 7;
    let months = months_between(birth, at);
    let years = months / 12;

    let parts = if hours < 2 {
        vec![(AgeUnit::Minute, elapsed.num_minutes())]
    } else if days < 2 {
        vec![(AgeUnit::Hour, hours)]
    } else if weeks < 4 {
        vec![(AgeUnit::Day, days)]
    } else if years < 1 {
        vec![(AgeUnit::Week, weeks), (AgeUnit::Day, days - weeks * 7)]
    } else if years < 2 {
        let remainder = sub_months(at, months)
            .map(|anchor| (anchor - birth).num_days())
            .unwrap_or(0);
        vec![(AgeUnit::Month, months), (AgeUnit::Day, remainder)]
    } else if years < 18 {
        let remainder = sub_months(at, years * 12)
            .map(|anchor| months_between(birth, anchor))
            .unwrap_or(0);
        vec![(AgeUnit::Year, years), (AgeUnit::Month, remainder)]
    } else {
        vec![(AgeUnit::Year, years)]
    };

    Ok(AgeBreakdown { parts })
}

/// Render an age with a custom formatter
pub fn format_age(
    birth: NaiveDateTime,
    at: NaiveDateTime,
    formatter: &dyn UnitFormatter,
) -> Result<String> {
    let breakdown = age_breakdown(birth, at)?;
    let rendered: Vec<String> = breakdown
        .parts()
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(unit, value)| formatter.format_unit(*unit, *value))
        .collect();

    Ok(match rendered.as_slice() {
        [] => breakdown
            .parts()
            .last()
            .map(|(unit, _)| formatter.format_unit(*unit, 0))
            .unwrap_or_default(),
        [single] => single.clone(),
        [big, small, ..] => formatter.join(big, small),
    })
}

/// Render an age with abbreviated English units
pub fn age(birth: NaiveDateTime, at: NaiveDateTime) -> Result<String> {
    format_age(birth, at, &ShortEnglish)
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD HH:MM[:SS]`
pub fn parse_moment(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(moment);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::invalid_input(format!("unrecognised date '{input}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn at(s: &str) -> NaiveDateTime {
        parse_moment(s).unwrap()
    }

    #[test_case("2024-03-01T10:00", "2024-03-01T10:45", "45 min" ; "minutes")]
    #[test_case("2024-03-01T10:00", "2024-03-01T11:59", "119 min" ; "just under two hours")]
    #[test_case("2024-03-01T10:00", "2024-03-02T09:00", "23 hr" ; "hours")]
    #[test_case("2024-03-01", "2024-03-03", "2 days" ; "two days")]
    #[test_case("2024-03-01", "2024-03-27", "26 days" ; "under four weeks")]
    #[test_case("2024-01-01", "2024-02-01", "4 wks, 3 days" ; "weeks and days")]
    #[test_case("2024-01-01", "2024-01-29", "4 wks" ; "exact weeks")]
    #[test_case("2022-01-10", "2023-03-15", "14 mths, 5 days" ; "months and days")]
    #[test_case("2000-01-15", "2017-02-20", "17 yrs, 1 mth" ; "years and months")]
    #[test_case("2010-06-01", "2020-06-01", "10 yrs" ; "exact years")]
    #[test_case("1980-05-20", "2024-05-19", "43 yrs" ; "adult before birthday")]
    #[test_case("1980-05-20", "2024-05-20", "44 yrs" ; "adult on birthday")]
    fn test_age(birth: &str, now: &str, expected: &str) {
        assert_eq!(age(at(birth), at(now)).unwrap(), expected);
    }

    #[test]
    fn test_age_singular_units() {
        assert_eq!(age(at("2023-01-01"), at("2024-01-02")).unwrap(), "12 mths, 1 day");
        assert_eq!(age(at("2020-01-01"), at("2022-02-01")).unwrap(), "2 yrs, 1 mth");
    }

    #[test]
    fn test_age_zero_renders_smallest_unit() {
        let moment = at("2024-03-01T10:00");
        assert_eq!(age(moment, moment).unwrap(), "0 min");
    }

    #[test]
    fn test_age_rejects_future_birth() {
        let err = age(at("2025-01-01"), at("2024-01-01")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_breakdown_parts() {
        let breakdown = age_breakdown(at("2000-01-15"), at("2017-02-20")).unwrap();
        assert_eq!(breakdown.get(AgeUnit::Year), Some(17));
        assert_eq!(breakdown.get(AgeUnit::Month), Some(1));
        assert_eq!(breakdown.get(AgeUnit::Day), None);
    }

    #[test]
    fn test_months_between_end_of_month() {
        assert_eq!(months_between(at("2024-01-31"), at("2024-02-29")), 1);
        assert_eq!(months_between(at("2024-01-31"), at("2024-02-28")), 0);
        assert_eq!(months_between(at("2024-03-15"), at("2024-03-20")), 0);
    }

    struct Verbose;

    impl UnitFormatter for Verbose {
        fn format_unit(&self, unit: AgeUnit, value: i64) -> String {
            format!("{value} {unit:?}")
        }

        fn join(&self, big: &str, small: &str) -> String {
            format!("{big} and {small}")
        }
    }

    #[test]
    fn test_custom_formatter() {
        let rendered = format_age(at("2000-01-15"), at("2017-02-20"), &Verbose).unwrap();
        assert_eq!(rendered, "17 Year and 1 Month");
    }

    #[test]
    fn test_parse_moment_formats() {
        assert_eq!(at("2024-03-01"), at("2024-03-01T00:00:00"));
        assert_eq!(at("2024-03-01 08:30"), at("2024-03-01T08:30"));
        assert!(parse_moment("03/01/2024").is_err());
    }
}
