//! Typed attribute values and the date/time/duration types behind them.
//!
//! Date and date-time values keep their local wall-clock fields together
//! with an optional timezone offset. Arithmetic works on the wall-clock
//! fields and copies the offset through untouched, so the offset of a result
//! is always the offset of the operand.

use std::{fmt, str::FromStr};

use chrono::{Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::{datatype::DataType, error::VerdictError};

// ── Lexical helpers ───────────────────────────────────────────────────────────

fn parse_digits<T: FromStr>(s: &str, what: &str) -> Result<T, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {} '{}'", what, s));
    }
    s.parse::<T>().map_err(|_| format!("{} '{}' out of range", what, s))
}

/// Turn the digits after a decimal point into nanoseconds. Digits past the
/// ninth are dropped.
fn parse_fraction(digits: &str) -> Result<u32, String> {
    if digits.is_empty() {
        return Ok(0);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid fractional seconds '{}'", digits));
    }
    let kept = &digits[..digits.len().min(9)];
    format!("{:0<9}", kept)
        .parse::<u32>()
        .map_err(|e| e.to_string())
}

fn parse_offset(s: &str) -> Result<Option<FixedOffset>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    if s == "Z" {
        return Ok(FixedOffset::east_opt(0));
    }
    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(format!("invalid timezone '{}'", s));
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| format!("invalid timezone '{}'", s))?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(format!("invalid timezone '{}'", s));
    }
    let hours: i32 = parse_digits(hours, "timezone hours")?;
    let minutes: i32 = parse_digits(minutes, "timezone minutes")?;
    if hours > 14 || minutes > 59 {
        return Err(format!("timezone '{}' out of range", s));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(Some)
        .ok_or_else(|| format!("timezone '{}' out of range", s))
}

/// Parse `[-]YYYY-MM-DD` at the start of `s`, returning the date and the
/// unparsed remainder.
fn split_date(s: &str) -> Result<(NaiveDate, &str), String> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let year_end = body.find('-').ok_or("missing '-' after year")?;
    let year_digits = &body[..year_end];
    if year_digits.len() < 4 {
        return Err(format!("year '{}' must have at least four digits", year_digits));
    }
    let year: i32 = parse_digits(year_digits, "year")?;
    let year = if negative { -year } else { year };

    let rest = &body[year_end + 1..];
    if rest.len() < 5 || rest.as_bytes()[2] != b'-' {
        return Err("expected MM-DD after the year".to_string());
    }
    let month: u32 = parse_digits(&rest[0..2], "month")?;
    let day: u32 = parse_digits(&rest[3..5], "day")?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{}-{:02}-{:02} is not a calendar date", year, month, day))?;
    Ok((date, &rest[5..]))
}

fn write_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    if year < 0 {
        write!(f, "-{:04}", -year)
    } else {
        write!(f, "{:04}", year)
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<FixedOffset>) -> fmt::Result {
    let Some(offset) = offset else {
        return Ok(());
    };
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return f.write_str("Z");
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    write!(f, "{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
}

fn write_seconds(f: &mut fmt::Formatter<'_>, seconds: i64, nanos: u32) -> fmt::Result {
    if nanos == 0 {
        write!(f, "{}", seconds)
    } else {
        let fraction = format!("{:09}", nanos);
        write!(f, "{}.{}", seconds, fraction.trim_end_matches('0'))
    }
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(u32::try_from(months).ok()?))
    } else {
        date.checked_sub_months(Months::new(u32::try_from(-months).ok()?))
    }
}

// ── xs:date ───────────────────────────────────────────────────────────────────

/// An `xs:date`: a proleptic Gregorian date with an optional offset.
///
/// Years use astronomical numbering, so `-2000` is a valid BC year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XsDate {
    pub date: NaiveDate,
    pub offset: Option<FixedOffset>,
}

impl XsDate {
    pub fn new(date: NaiveDate, offset: Option<FixedOffset>) -> Self {
        Self { date, offset }
    }

    /// Build a date without an offset. Returns `None` for impossible dates.
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Self { date, offset: None })
    }

    pub fn with_offset(self, offset: FixedOffset) -> Self {
        Self { offset: Some(offset), ..self }
    }

    /// Shift by a signed number of months, pinning the day to the end of the
    /// target month when it would overflow. The offset is kept as is.
    pub fn checked_add_year_month(&self, duration: &YearMonthDuration) -> Option<Self> {
        add_months(self.date, duration.months()).map(|date| Self { date, offset: self.offset })
    }
}

impl FromStr for XsDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err("non-ASCII characters".to_string());
        }
        let (date, rest) = split_date(s)?;
        Ok(Self { date, offset: parse_offset(rest)? })
    }
}

impl fmt::Display for XsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_year(f, self.date.year())?;
        write!(f, "-{:02}-{:02}", self.date.month(), self.date.day())?;
        write_offset(f, self.offset)
    }
}

// ── xs:dateTime ───────────────────────────────────────────────────────────────

/// An `xs:dateTime`: wall-clock date and time (nanosecond precision) with an
/// optional offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XsDateTime {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl XsDateTime {
    pub fn new(local: NaiveDateTime, offset: Option<FixedOffset>) -> Self {
        Self { local, offset }
    }

    /// Build a date-time without an offset. Returns `None` for impossible
    /// field combinations.
    pub fn ymd_hms_milli(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        milli: u32,
    ) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)?;
        Some(Self { local: NaiveDateTime::new(date, time), offset: None })
    }

    pub fn with_offset(self, offset: FixedOffset) -> Self {
        Self { offset: Some(offset), ..self }
    }

    /// Add a day-time duration to the wall-clock fields. Carries cascade
    /// through every field up to the year; the offset is kept as is.
    pub fn checked_add_day_time(&self, duration: &DayTimeDuration) -> Option<Self> {
        self.local
            .checked_add_signed(duration.as_delta())
            .map(|local| Self { local, offset: self.offset })
    }

    /// Shift by a signed number of months, pinning the day to the end of the
    /// target month when it would overflow. The offset is kept as is.
    pub fn checked_add_year_month(&self, duration: &YearMonthDuration) -> Option<Self> {
        add_months(self.local.date(), duration.months())
            .map(|date| Self { local: NaiveDateTime::new(date, self.local.time()), offset: self.offset })
    }

    /// True when both values denote the same instant. Values without an
    /// offset are compared by their wall-clock fields.
    pub fn same_instant(&self, other: &XsDateTime) -> bool {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => instant_key(self.local, a) == instant_key(other.local, b),
            _ => self.local == other.local,
        }
    }
}

/// Seconds since the epoch in UTC plus the sub-second part. Computed in
/// `i128` so values at the edge of the calendar range never overflow.
fn instant_key(local: NaiveDateTime, offset: FixedOffset) -> (i128, u32) {
    let utc = local.and_utc();
    (
        i128::from(utc.timestamp()) - i128::from(offset.local_minus_utc()),
        utc.timestamp_subsec_nanos(),
    )
}

impl FromStr for XsDateTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err("non-ASCII characters".to_string());
        }
        let (date_part, time_part) = s.split_once('T').ok_or("missing 'T' separator")?;
        let (date, rest) = split_date(date_part)?;
        if !rest.is_empty() {
            return Err(format!("unexpected '{}' after the date", rest));
        }

        let bytes = time_part.as_bytes();
        if bytes.len() < 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err("expected hh:mm:ss after 'T'".to_string());
        }
        let hour: u32 = parse_digits(&time_part[0..2], "hour")?;
        let minute: u32 = parse_digits(&time_part[3..5], "minute")?;
        let second: u32 = parse_digits(&time_part[6..8], "second")?;

        let mut rest = &time_part[8..];
        let mut nanos = 0;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            if end == 0 {
                return Err("expected digits after '.'".to_string());
            }
            nanos = parse_fraction(&after_dot[..end])?;
            rest = &after_dot[end..];
        }

        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or_else(|| format!("{:02}:{:02}:{:02} is not a valid time", hour, minute, second))?;
        Ok(Self { local: NaiveDateTime::new(date, time), offset: parse_offset(rest)? })
    }
}

impl fmt::Display for XsDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.local.date();
        write_year(f, date.year())?;
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:",
            date.month(),
            date.day(),
            self.local.hour(),
            self.local.minute()
        )?;
        if self.local.second() < 10 {
            f.write_str("0")?;
        }
        write_seconds(f, i64::from(self.local.second()), self.local.nanosecond())?;
        write_offset(f, self.offset)
    }
}

// ── xs:dayTimeDuration ────────────────────────────────────────────────────────

/// An `xs:dayTimeDuration`, stored as a signed `TimeDelta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayTimeDuration(TimeDelta);

impl DayTimeDuration {
    pub fn from_delta(delta: TimeDelta) -> Self {
        Self(delta)
    }

    pub fn zero() -> Self {
        Self(TimeDelta::zero())
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    pub fn negated(&self) -> Self {
        Self(-self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for DayTimeDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err("non-ASCII characters".to_string());
        }
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let body = body.strip_prefix('P').ok_or("duration must start with 'P'")?;
        let (day_part, time_part) = match body.split_once('T') {
            Some((days, time)) => (days, Some(time)),
            None => (body, None),
        };

        let overflow = || "duration out of range".to_string();
        let mut seconds: i64 = 0;
        let mut nanos: u32 = 0;
        let mut components = 0;

        if !day_part.is_empty() {
            let days = day_part
                .strip_suffix('D')
                .ok_or("expected a day component ending in 'D'")?;
            let days: i64 = parse_digits(days, "days")?;
            seconds = days.checked_mul(86_400).ok_or_else(overflow)?;
            components += 1;
        }

        if let Some(time) = time_part {
            if time.is_empty() {
                return Err("'T' must be followed by a time component".to_string());
            }
            let mut rest = time;
            for (designator, factor) in [('H', 3_600_i64), ('M', 60)] {
                if let Some(idx) = rest.find(designator) {
                    let n: i64 = parse_digits(&rest[..idx], "duration component")?;
                    let add = n.checked_mul(factor).ok_or_else(overflow)?;
                    seconds = seconds.checked_add(add).ok_or_else(overflow)?;
                    rest = &rest[idx + 1..];
                    components += 1;
                }
            }
            if !rest.is_empty() {
                let secs = rest
                    .strip_suffix('S')
                    .ok_or("expected a seconds component ending in 'S'")?;
                let (whole, fraction) = secs.split_once('.').unwrap_or((secs, ""));
                let whole: i64 = parse_digits(whole, "seconds")?;
                seconds = seconds.checked_add(whole).ok_or_else(overflow)?;
                nanos = parse_fraction(fraction)?;
                components += 1;
            }
        }

        if components == 0 {
            return Err("duration has no components".to_string());
        }

        let delta = TimeDelta::try_seconds(seconds)
            .ok_or_else(overflow)?
            .checked_add(&TimeDelta::nanoseconds(i64::from(nanos)))
            .ok_or_else(overflow)?;
        Ok(Self(if negative { -delta } else { delta }))
    }
}

impl fmt::Display for DayTimeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("PT0S");
        }
        let negative = self.0 < TimeDelta::zero();
        let magnitude = if negative { -self.0 } else { self.0 };
        let total = magnitude.num_seconds();
        let nanos = magnitude.subsec_nanos().unsigned_abs();
        let (days, hours, minutes, seconds) =
            (total / 86_400, (total % 86_400) / 3_600, (total % 3_600) / 60, total % 60);

        if negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if days > 0 {
            write!(f, "{}D", days)?;
        }
        if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
            f.write_str("T")?;
            if hours > 0 {
                write!(f, "{}H", hours)?;
            }
            if minutes > 0 {
                write!(f, "{}M", minutes)?;
            }
            if seconds > 0 || nanos > 0 {
                write_seconds(f, seconds, nanos)?;
                f.write_str("S")?;
            }
        }
        Ok(())
    }
}

// ── xs:yearMonthDuration ──────────────────────────────────────────────────────

/// An `xs:yearMonthDuration`, stored as a signed total number of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonthDuration {
    months: i64,
}

impl YearMonthDuration {
    pub fn from_months(months: i64) -> Self {
        Self { months }
    }

    /// `negative` is applied to the combined years and months. `None` when
    /// the total does not fit.
    pub fn new(negative: bool, years: i64, months: i64) -> Option<Self> {
        let total = years.checked_mul(12)?.checked_add(months)?;
        let months = if negative { total.checked_neg()? } else { total };
        Some(Self { months })
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    /// Saturates at `i64::MIN`, which no calendar arithmetic accepts anyway.
    pub fn negated(&self) -> Self {
        Self { months: self.months.saturating_neg() }
    }
}

impl FromStr for YearMonthDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err("non-ASCII characters".to_string());
        }
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut rest = body.strip_prefix('P').ok_or("duration must start with 'P'")?;
        let mut total: i64 = 0;
        let mut components = 0;
        for (designator, factor) in [('Y', 12_i64), ('M', 1)] {
            if let Some(idx) = rest.find(designator) {
                let n: i64 = parse_digits(&rest[..idx], "duration component")?;
                total = n
                    .checked_mul(factor)
                    .and_then(|v| v.checked_add(total))
                    .ok_or("duration out of range")?;
                rest = &rest[idx + 1..];
                components += 1;
            }
        }
        if components == 0 || !rest.is_empty() {
            return Err("expected [-]P[nY][nM]".to_string());
        }
        Ok(Self { months: if negative { -total } else { total } })
    }
}

impl fmt::Display for YearMonthDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months == 0 {
            return f.write_str("P0M");
        }
        if self.months < 0 {
            f.write_str("-")?;
        }
        let magnitude = self.months.unsigned_abs();
        f.write_str("P")?;
        if magnitude / 12 > 0 {
            write!(f, "{}Y", magnitude / 12)?;
        }
        if magnitude % 12 > 0 {
            write!(f, "{}M", magnitude % 12)?;
        }
        Ok(())
    }
}

// ── AttributeValue ────────────────────────────────────────────────────────────

/// A single typed attribute value.
///
/// Serialized as `{ "DataType": "<xsd id>", "Value": "<lexical form>" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TypedLexical", try_from = "TypedLexical")]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Date(XsDate),
    DateTime(XsDateTime),
    DayTimeDuration(DayTimeDuration),
    YearMonthDuration(YearMonthDuration),
    AnyUri(String),
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::String(value.into())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::String(_) => DataType::String,
            AttributeValue::Boolean(_) => DataType::Boolean,
            AttributeValue::Integer(_) => DataType::Integer,
            AttributeValue::Double(_) => DataType::Double,
            AttributeValue::Date(_) => DataType::Date,
            AttributeValue::DateTime(_) => DataType::DateTime,
            AttributeValue::DayTimeDuration(_) => DataType::DayTimeDuration,
            AttributeValue::YearMonthDuration(_) => DataType::YearMonthDuration,
            AttributeValue::AnyUri(_) => DataType::AnyUri,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The text of a string or anyURI value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::AnyUri(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) | AttributeValue::AnyUri(s) => f.write_str(s),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Double(d) => write!(f, "{}", d),
            AttributeValue::Date(d) => write!(f, "{}", d),
            AttributeValue::DateTime(dt) => write!(f, "{}", dt),
            AttributeValue::DayTimeDuration(d) => write!(f, "{}", d),
            AttributeValue::YearMonthDuration(d) => write!(f, "{}", d),
        }
    }
}

/// Serde surrogate for [`AttributeValue`].
#[derive(Serialize, Deserialize)]
struct TypedLexical {
    #[serde(rename = "DataType")]
    data_type: DataType,
    #[serde(rename = "Value")]
    value: String,
}

impl From<AttributeValue> for TypedLexical {
    fn from(value: AttributeValue) -> Self {
        Self { data_type: value.data_type(), value: value.to_string() }
    }
}

impl TryFrom<TypedLexical> for AttributeValue {
    type Error = VerdictError;

    fn try_from(lexical: TypedLexical) -> Result<Self, Self::Error> {
        lexical
            .data_type
            .parse(&lexical.value)
            .map_err(|status| VerdictError::InvalidValue { reason: status.message().to_string() })
    }
}
