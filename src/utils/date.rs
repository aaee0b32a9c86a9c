use chrono::{Datelike, NaiveDate};

/// "Monday 2nd January"
pub fn ordinal_date(date: NaiveDate) -> String {
    let suffix = match date.day() {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{} {}{} {}", date.format("%A"), date.day(), suffix, date.format("%B"))
}
