use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts `today`, `yesterday`, `-N` (days back), `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    parse_day_relative_to(input, today())
}

pub fn parse_day_relative_to(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Some(num_str) = input.strip_prefix('-') {
        let invalid = || anyhow!("Invalid relative day: {}", input);
        let days: i64 = num_str.parse().map_err(|_| invalid())?;
        if days < 0 {
            return Err(invalid());
        }
        let offset = Duration::try_days(days).ok_or_else(invalid)?;
        return today.checked_sub_signed(offset).ok_or_else(invalid);
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%d/%m/%Y") {
        return Ok(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// `dd/mm/yyyy`
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_day_relative_to("today", anchor()).unwrap(), anchor());
        assert_eq!(
            parse_day_relative_to("yesterday", anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_day_relative_to("-2", anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_day_relative_to("2024-03-15", anchor()).unwrap(), expected);
        assert_eq!(parse_day_relative_to("15/03/2024", anchor()).unwrap(), expected);
        assert!(parse_day_relative_to("someday", anchor()).is_err());
        assert!(parse_day_relative_to("-x", anchor()).is_err());
    }

    #[test]
    fn test_relative_day_out_of_range_is_an_error() {
        assert!(parse_day_relative_to("-9999999999", anchor()).is_err());
        assert!(parse_day_relative_to("-999999999999999", anchor()).is_err());
        assert!(parse_day_relative_to(&format!("-{}", i64::MAX), anchor()).is_err());
        // "--5" would otherwise land five days in the future
        assert!(parse_day_relative_to("--5", anchor()).is_err());
        assert_eq!(parse_day_relative_to("-0", anchor()).unwrap(), anchor());
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()), "05/03/2024");
    }
}
