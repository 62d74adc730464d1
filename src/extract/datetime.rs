//! Transaction date and time extraction.

use chrono::NaiveDate;

use super::patterns::{DATE_NUMERIC_DMY, DATE_NUMERIC_YMD, DATE_TEXT_DMY, DATE_TEXT_MDY, TIME_OF_DAY};

/// Finds the transaction date.
///
/// Lines are scanned top to bottom trying a fixed-order pattern list; the
/// first match that parses to a real calendar date wins and stops the search.
pub fn extract_date(lines: &[&str]) -> Option<NaiveDate> {
    for line in lines {
        if let Some(m) = DATE_NUMERIC_DMY.find(line) {
            if let Some(date) = parse_numeric_day_first(m.as_str()) {
                return Some(date);
            }
        }
        if let Some(m) = DATE_NUMERIC_YMD.find(line) {
            if let Some(date) = parse_numeric_year_first(m.as_str()) {
                return Some(date);
            }
        }
        if let Some(caps) = DATE_TEXT_MDY.captures(line) {
            if let Some(date) = build_date(&caps[3], month_number(&caps[1])?, &caps[2]) {
                return Some(date);
            }
        }
        if let Some(caps) = DATE_TEXT_DMY.captures(line) {
            if let Some(date) = build_date(&caps[3], month_number(&caps[2])?, &caps[1]) {
                return Some(date);
            }
        }
    }
    None
}

/// Finds the first time-of-day token anywhere in the transcript.
pub fn extract_time(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| TIME_OF_DAY.find(line))
        .map(|m| m.as_str().trim().to_string())
}

/// "01/15/2024" style. Month-first is tried before day-first, matching how
/// North American receipts are usually printed.
fn parse_numeric_day_first(token: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let year = expand_year(parts[2].parse().ok()?);
    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

/// "2024-01-15" style.
fn parse_numeric_year_first(token: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    let year = expand_year(parts[0].parse().ok()?);
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn build_date(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let year = expand_year(year.parse().ok()?);
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years pivot at 70: "24" is 2024, "99" is 1999.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        if year < 70 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
