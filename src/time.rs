//! UTCTime and GeneralizedTime.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::error::Error;


//------------ DateTime ------------------------------------------------------

/// A calendar date and time of day in UTC.
///
/// The type covers the years 1 to 9999 of the proleptic Gregorian calendar
/// with microsecond precision. The fields are always valid, i.e., there is
/// no 31st of April, no 24th hour, and no leap second.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
}

impl DateTime {
    /// Creates a new value from its parts.
    pub fn new(
        year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8,
    ) -> Result<Self, Error> {
        let valid = (1..=9999).contains(&year)
            && (1..=12).contains(&month)
            && day >= 1 && day <= days_in_month(year, month)
            && hour < 24 && minute < 60 && second < 60;
        if !valid {
            return Err(Error::value_type("invalid date or time"))
        }
        Ok(DateTime { year, month, day, hour, minute, second, microsecond: 0 })
    }

    /// Returns the same time with the given microseconds.
    pub fn with_microsecond(self, microsecond: u32) -> Result<Self, Error> {
        if microsecond >= 1_000_000 {
            return Err(Error::value_type("invalid microseconds"))
        }
        Ok(DateTime { microsecond, ..self })
    }

    pub fn year(self) -> u16 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn second(self) -> u8 {
        self.second
    }

    pub fn microsecond(self) -> u32 {
        self.microsecond
    }

    /// Returns the microseconds since 1970-01-01T00:00:00.
    fn timestamp_micros(self) -> i128 {
        let days = days_from_civil(
            i64::from(self.year), u32::from(self.month), u32::from(self.day)
        );
        let secs = i128::from(days) * 86400
            + i128::from(self.hour) * 3600
            + i128::from(self.minute) * 60
            + i128::from(self.second);
        secs * 1_000_000 + i128::from(self.microsecond)
    }

    fn from_timestamp_micros(micros: i128) -> Option<Self> {
        let secs = micros.div_euclid(1_000_000);
        let microsecond = micros.rem_euclid(1_000_000) as u32;
        let days = secs.div_euclid(86400);
        let day_secs = secs.rem_euclid(86400) as u32;
        if days.abs() > i128::from(i32::MAX) {
            return None
        }
        let (year, month, day) = civil_from_days(days as i64);
        if !(1..=9999).contains(&year) {
            return None
        }
        Some(DateTime {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (day_secs / 3600) as u8,
            minute: (day_secs / 60 % 60) as u8,
            second: (day_secs % 60) as u8,
            microsecond,
        })
    }

    /// Returns the time shifted by the given number of microseconds.
    ///
    /// Returns `None` if the result falls outside of the supported years.
    pub fn add_micros(self, micros: i128) -> Option<Self> {
        Self::from_timestamp_micros(self.timestamp_micros() + micros)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day,
            self.hour, self.minute, self.second
        )?;
        if self.microsecond > 0 {
            write!(f, ".{:06}", self.microsecond)?;
        }
        Ok(())
    }
}

fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => if is_leap(year) { 29 } else { 28 },
        _ => 31,
    }
}

/// Returns the number of days since 1970-01-01.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let yoe = year - era * 400;
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Returns year, month, and day for days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}


//------------ TimeType ------------------------------------------------------

/// The two ASN.1 time types.
///
/// # BER Encoding
///
/// Both types are encoded as VisibleString with a textual representation.
/// DER allows exactly one form: `YYMMDDHHMMSSZ` for UTCTime and
/// `YYYYMMDDHHMMSS[.f]Z` for GeneralizedTime where the fraction has no
/// trailing zeros. BER additionally allows leaving out the seconds
/// (and, for GeneralizedTime, the minutes), time zone offsets instead of
/// `Z`, and fractions of the last given unit in GeneralizedTime. Those
/// values are normalized to UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum TimeType {
    Utc,
    Generalized,
}

impl TimeType {
    pub(crate) fn name(self) -> &'static str {
        match self {
            TimeType::Utc => "UTCTime",
            TimeType::Generalized => "GeneralizedTime",
        }
    }

    /// Checks a time for use with this type.
    ///
    /// UTCTime can only express the years 1950 to 2049 and drops the
    /// microseconds.
    pub(crate) fn sanitize(self, time: DateTime) -> Result<DateTime, Error> {
        match self {
            TimeType::Utc => {
                if time.year < 1950 || time.year > 2049 {
                    return Err(Error::value_type(
                        "UTCTime can hold only 1950-2049 years"
                    ))
                }
                Ok(DateTime { microsecond: 0, ..time })
            }
            TimeType::Generalized => Ok(time)
        }
    }

    /// Parses the encoded text of a value.
    ///
    /// Returns the time and whether the BER form was used, which is only
    /// tried if `bered` is true.
    pub(crate) fn parse(
        self, raw: &[u8], bered: bool,
    ) -> Result<(DateTime, bool), Error> {
        let strict = match self {
            TimeType::Utc => utc_from_der(raw),
            TimeType::Generalized => gen_from_der(raw),
        };
        let err = match strict {
            Ok(time) => return Ok((time, false)),
            Err(err) => err,
        };
        if !bered {
            xerr!(return Err(Error::decode(
                format!("invalid {} format: {}", self.name(), err)
            )))
        }
        let relaxed = match self {
            TimeType::Utc => utc_from_ber(raw),
            TimeType::Generalized => gen_from_ber(raw),
        };
        match relaxed {
            Ok(time) => Ok((time, true)),
            Err(err) => xerr!(Err(Error::decode(
                format!("invalid {} format: {}", self.name(), err)
            )))
        }
    }

    /// Returns the DER encoded text.
    pub(crate) fn encode(self, time: &DateTime) -> Vec<u8> {
        let res = match self {
            TimeType::Utc => {
                format!(
                    "{:02}{:02}{:02}{:02}{:02}{:02}Z",
                    time.year % 100, time.month, time.day,
                    time.hour, time.minute, time.second
                )
            }
            TimeType::Generalized => {
                let mut res = format!(
                    "{:04}{:02}{:02}{:02}{:02}{:02}",
                    time.year, time.month, time.day,
                    time.hour, time.minute, time.second
                );
                if time.microsecond > 0 {
                    let fraction = format!(".{:06}", time.microsecond);
                    res.push_str(fraction.trim_end_matches('0'));
                }
                res.push('Z');
                res
            }
        };
        res.into_bytes()
    }
}


//------------ Parsers -------------------------------------------------------

type ParseResult<T> = Result<T, &'static str>;

/// Parses a non-empty sequence of decimal digits.
fn pure_int(digits: &[u8]) -> ParseResult<u32> {
    if digits.is_empty() || digits.len() > 9 {
        return Err("non-pure integer")
    }
    digits.iter().try_fold(0u32, |res, ch| {
        if ch.is_ascii_digit() {
            Ok(res * 10 + u32::from(ch - b'0'))
        }
        else {
            Err("non-pure integer")
        }
    })
}

/// Parses consecutive two digit fields.
fn pairs<const N: usize>(digits: &[u8]) -> ParseResult<[u8; N]> {
    let mut res = [0u8; N];
    for (i, item) in res.iter_mut().enumerate() {
        let pair = digits.get(2 * i..2 * i + 2).ok_or("too short")?;
        *item = pure_int(pair)? as u8;
    }
    Ok(res)
}

fn make(
    year: u32, month: u8, day: u8, hour: u8, minute: u8, second: u8,
) -> ParseResult<DateTime> {
    DateTime::new(year as u16, month, day, hour, minute, second)
        .map_err(|_| "invalid date or time")
}

/// Converts decimal fraction digits of a unit into microseconds.
fn fraction_micros(digits: &[u8], unit_micros: u128) -> ParseResult<i128> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err("invalid fraction")
    }
    // More digits than this are far below a microsecond.
    let digits = &digits[..digits.len().min(18)];
    let num = digits.iter().fold(0u128, |res, ch| {
        res * 10 + u128::from(ch - b'0')
    });
    let den = 10u128.pow(digits.len() as u32);
    Ok(((num * unit_micros + den / 2) / den) as i128)
}

/// Parses a UTC offset of the form `HHMM` into seconds.
fn hhmm_offset(raw: &[u8]) -> ParseResult<i64> {
    let value = pure_int(raw)?;
    let minutes = i64::from(value % 100);
    if minutes >= 60 {
        return Err("invalid UTC offset minutes")
    }
    Ok(60 * minutes + 3600 * i64::from(value / 100))
}

fn shift(time: DateTime, micros: i128) -> ParseResult<DateTime> {
    time.add_micros(micros).ok_or("time out of range")
}

fn utc_from_der(raw: &[u8]) -> ParseResult<DateTime> {
    if raw.len() != 13 {
        return Err("invalid UTCTime length")
    }
    if raw[12] != b'Z' {
        return Err("non UTC timezone")
    }
    let [year, month, day, hour, minute, second] = pairs::<6>(&raw[..12])?;
    let year = u32::from(year) + if year < 50 { 2000 } else { 1900 };
    make(year, month, day, hour, minute, second)
}

fn utc_from_ber(raw: &[u8]) -> ParseResult<DateTime> {
    let [year, month, day, hour, minute] = pairs::<5>(raw)?;
    let mut rest = &raw[10..];
    if rest.is_empty() {
        return Err("no timezone")
    }
    let year = u32::from(year) + if year < 50 { 2000 } else { 1900 };
    let mut time = make(year, month, day, hour, minute, 0)?;
    let mut offset = 0;
    if let Some(stripped) = rest.strip_suffix(b"Z") {
        rest = stripped
    }
    else {
        if rest.len() < 5 {
            return Err("invalid UTC offset")
        }
        let (head, tz) = rest.split_at(rest.len() - 5);
        let sign = match tz[0] {
            b'-' => -1,
            b'+' => 1,
            _ => return Err("invalid UTC offset")
        };
        offset = hhmm_offset(&tz[1..])?;
        if offset > 14 * 3600 {
            return Err("too big UTC offset")
        }
        offset *= sign;
        rest = head;
    }
    if !rest.is_empty() {
        if rest.len() != 2 {
            return Err("invalid UTC offset seconds")
        }
        let seconds = pure_int(rest)?;
        if seconds >= 60 {
            return Err("invalid seconds value")
        }
        time = shift(time, i128::from(seconds) * 1_000_000)?;
    }
    let time = shift(time, -i128::from(offset) * 1_000_000)?;
    if time.year < 1950 || time.year > 2049 {
        return Err("UTCTime can hold only 1950-2049 years")
    }
    Ok(time)
}

fn gen_from_der(raw: &[u8]) -> ParseResult<DateTime> {
    if raw.len() == 15 {
        if raw[14] != b'Z' {
            return Err("non UTC timezone")
        }
        let year = pure_int(&raw[..4])?;
        let [month, day, hour, minute, second] = pairs::<5>(&raw[4..14])?;
        return make(year, month, day, hour, minute, second)
    }
    if raw.len() >= 17 {
        if raw[raw.len() - 1] != b'Z' {
            return Err("non UTC timezone")
        }
        if raw[14] != b'.' {
            return Err("no fractions separator")
        }
        let fraction = &raw[15..raw.len() - 1];
        if fraction.last() == Some(&b'0') {
            return Err("trailing zero")
        }
        if fraction.len() > 6 {
            return Err("only microsecond fractions are supported")
        }
        let us = pure_int(fraction)? * 10u32.pow(6 - fraction.len() as u32);
        let year = pure_int(&raw[..4])?;
        let [month, day, hour, minute, second] = pairs::<5>(&raw[4..14])?;
        return make(year, month, day, hour, minute, second)?
            .with_microsecond(us).map_err(|_| "invalid fraction")
    }
    Err("invalid GeneralizedTime length")
}

fn is_decimal_sign(ch: u8) -> bool {
    ch == b'.' || ch == b','
}

fn gen_from_ber(raw: &[u8]) -> ParseResult<DateTime> {
    if raw.len() < 10 {
        return Err("invalid GeneralizedTime")
    }
    let year = pure_int(&raw[..4])?;
    let [month, day, hour] = pairs::<3>(&raw[4..10])?;
    let time = make(year, month, day, hour, 0, 0)?;
    let mut rest = &raw[10..];
    let mut offset = 0i64;
    if let Some(stripped) = rest.strip_suffix(b"Z") {
        rest = stripped
    }
    else {
        for &(ch, sign) in &[(b'-', -1), (b'+', 1)] {
            let idx = match rest.iter().rposition(|&item| item == ch) {
                Some(idx) => idx,
                None => continue,
            };
            let raw_offset: Vec<u8> = rest[idx + 1..].iter().copied()
                .filter(|&item| item != b':').collect();
            rest = &rest[..idx];
            offset = match raw_offset.len() {
                4 => hhmm_offset(&raw_offset)?,
                2 => 3600 * i64::from(pure_int(&raw_offset)?),
                _ => return Err("invalid UTC offset")
            };
            if offset > 14 * 3600 {
                return Err("too big UTC offset")
            }
            offset *= sign;
            break
        }
    }
    let local = gen_local_part(time, rest)?;
    shift(local, -i128::from(offset) * 1_000_000)
}

/// Applies minutes, seconds, and fractions to a time with hours only.
fn gen_local_part(mut time: DateTime, mut rest: &[u8]) -> ParseResult<DateTime> {
    // The units in order: hour, minute, second, each in microseconds.
    for &unit in &[3_600_000_000u128, 60_000_000, 1_000_000] {
        if rest.is_empty() {
            return Ok(time)
        }
        if is_decimal_sign(rest[0]) {
            return shift(time, fraction_micros(&rest[1..], unit)?)
        }
        if unit == 1_000_000 {
            return Err("invalid format after seconds")
        }
        if rest.len() < 2 {
            return Err(
                if unit == 3_600_000_000 { "stripped minutes" }
                else { "stripped seconds" }
            )
        }
        let next = unit / 60;
        time = shift(time, i128::from(pure_int(&rest[..2])?) * next as i128)?;
        rest = &rest[2..];
    }
    Ok(time)
}


//============ Tests =========================================================
