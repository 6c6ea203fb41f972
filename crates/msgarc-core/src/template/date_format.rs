//! Date formatting with `SimpleDateFormat`-style pattern letters.
//!
//! Archive templates written for the standard archiving module use patterns
//! like `yyyy.MM.dd_HH-mm-ss.SSS`, so the letter vocabulary is kept rather
//! than switching to strftime. Output is locale-independent (English names).
//!
//! Supported letters: `G y Y M L w D d F E u a H k K h m s S z Z X`.
//! Text inside single quotes is literal, `''` is a quote. Any other ASCII
//! letter is rejected; every non-letter is copied through.
//!
//! `z` prints the numeric offset (`+02:00`), not a zone name such as `CET`:
//! chrono's `Local` carries no zone abbreviation.

use std::fmt::{Display, Write as _};

use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike};

use crate::error::{ArchiveError, Result};

/// Pattern used for the `%TS` token.
pub const PRIMARY_TIMESTAMP_PATTERN: &str = "yyyy.MM.dd_HH-mm-ss.SSS";

const MONTHS: [&str; 12] = [
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

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Formats `at` according to `pattern`.
pub fn format_date<Tz>(pattern: &str, at: &DateTime<Tz>) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(q) = chars.next() {
                if q == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        out.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    out.push(q);
                }
            }
            if !closed {
                return Err(ArchiveError::malformed(format!(
                    "unterminated quote in date pattern '{pattern}'"
                )));
            }
        } else if c.is_ascii_alphabetic() {
            let mut count = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                count += 1;
            }
            write_field(&mut out, c, count, at).map_err(|letter| {
                ArchiveError::malformed(format!(
                    "illegal pattern character '{letter}' in date pattern '{pattern}'"
                ))
            })?;
        } else {
            out.push(c);
        }
    }

    Ok(out)
}

/// Appends one pattern field. Returns the letter back when it is unsupported.
fn write_field<Tz>(
    out: &mut String,
    letter: char,
    count: usize,
    at: &DateTime<Tz>,
) -> std::result::Result<(), char>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match letter {
        'G' => out.push_str(if at.year() > 0 { "AD" } else { "BC" }),
        'y' => write_year(out, at.year(), count),
        'Y' => write_year(out, at.iso_week().year(), count),
        'M' | 'L' => {
            let month = at.month() as usize;
            match count {
                1 | 2 => pad(out, month as i64, count),
                3 => out.push_str(&MONTHS[month - 1][..3]),
                _ => out.push_str(MONTHS[month - 1]),
            }
        }
        'w' => pad(out, at.iso_week().week() as i64, count),
        'D' => pad(out, at.ordinal() as i64, count),
        'd' => pad(out, at.day() as i64, count),
        'F' => pad(out, ((at.day() - 1) / 7 + 1) as i64, count),
        'E' => {
            let name = WEEKDAYS[at.weekday().num_days_from_monday() as usize];
            out.push_str(if count >= 4 { name } else { &name[..3] });
        }
        'u' => pad(out, at.weekday().number_from_monday() as i64, count),
        'a' => out.push_str(if at.hour() < 12 { "AM" } else { "PM" }),
        'H' => pad(out, at.hour() as i64, count),
        'k' => pad(out, if at.hour() == 0 { 24 } else { at.hour() as i64 }, count),
        'K' => pad(out, (at.hour() % 12) as i64, count),
        'h' => {
            let h = at.hour() % 12;
            pad(out, if h == 0 { 12 } else { h as i64 }, count)
        }
        'm' => pad(out, at.minute() as i64, count),
        's' => pad(out, at.second() as i64, count),
        'S' => pad(out, (at.nanosecond() / 1_000_000).min(999) as i64, count),
        'z' => {
            let _ = write!(out, "{}", at.offset());
        }
        'Z' => write_offset(out, offset_seconds(at), false, false),
        'X' => {
            let secs = offset_seconds(at);
            if secs == 0 {
                out.push('Z');
            } else {
                match count {
                    1 => write_offset(out, secs, false, true),
                    2 => write_offset(out, secs, false, false),
                    _ => write_offset(out, secs, true, false),
                }
            }
        }
        other => return Err(other),
    }
    Ok(())
}

/// Two letters truncate to the last two digits, any other count pads.
fn write_year(out: &mut String, year: i32, count: usize) {
    if count == 2 {
        pad(out, year.rem_euclid(100) as i64, 2);
    } else {
        pad(out, year as i64, count);
    }
}

fn pad(out: &mut String, value: i64, width: usize) {
    let _ = write!(out, "{value:0width$}");
}

fn offset_seconds<Tz: TimeZone>(at: &DateTime<Tz>) -> i32 {
    at.offset().fix().local_minus_utc()
}

fn write_offset(out: &mut String, secs: i32, colon: bool, hours_only: bool) {
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
    let _ = write!(out, "{sign}{hours:02}");
    if hours_only {
        return;
    }
    if colon {
        out.push(':');
    }
    let _ = write!(out, "{minutes:02}");
}
