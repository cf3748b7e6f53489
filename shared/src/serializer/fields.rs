//! Typed field readers over a JSON object

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::{
    FieldErrors, INVALID_DATETIME, INVALID_INTEGER, INVALID_NUMBER, INVALID_STRING,
    NON_FIELD_ERRORS, NOT_BLANK, NOT_NULL, REQUIRED, json_type_name,
};

/// Local date-time layouts, checked after the offset is split off
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Fraction digits kept (microseconds) and the most that may follow them
const KEPT_FRACTION_DIGITS: usize = 6;
const MAX_FRACTION_DIGITS: usize = 12;

/// Field reader that accumulates errors
///
/// Every reader returns `None` when the field is absent or invalid; the
/// failure (if any) is recorded and reported by [`Fields::into_errors`].
///
/// ```
/// use shared::serializer::Fields;
///
/// let payload = serde_json::json!({"Title": "Soup", "Inventory": "x"});
/// let mut fields = Fields::new(&payload, false).unwrap();
/// assert_eq!(fields.char_field("Title", 255).as_deref(), Some("Soup"));
/// assert_eq!(fields.integer("Inventory"), None);
/// assert!(fields.has_errors());
/// ```
#[derive(Debug)]
pub struct Fields<'a> {
    data: &'a Map<String, Value>,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> Fields<'a> {
    /// Start reading `payload`; anything but an object is rejected outright
    pub fn new(payload: &'a Value, partial: bool) -> Result<Self, FieldErrors> {
        match payload {
            Value::Object(data) => Ok(Self {
                data,
                partial,
                errors: FieldErrors::new(),
            }),
            other => Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            )),
        }
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record an error that is not tied to a type check
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn lookup(&mut self, name: &str, required: bool) -> Option<&'a Value> {
        let data = self.data;
        match data.get(name) {
            None => {
                if required && !self.partial {
                    self.errors.add(name, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.errors.add(name, NOT_NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    // ── Text ────────────────────────────────────────────────────────

    /// Required, non-blank text (surrounding whitespace trimmed)
    pub fn char_field(&mut self, name: &str, max_len: usize) -> Option<String> {
        let value = self.lookup(name, true)?;
        let text = self.text(name, value, max_len)?;
        if text.is_empty() {
            self.errors.add(name, NOT_BLANK);
            return None;
        }
        Some(text)
    }

    /// Optional text that may be blank
    pub fn blank_char_field(&mut self, name: &str, max_len: usize) -> Option<String> {
        let value = self.lookup(name, false)?;
        self.text(name, value, max_len)
    }

    fn text(&mut self, name: &str, value: &Value, max_len: usize) -> Option<String> {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(name, INVALID_STRING);
                return None;
            }
        };
        if text.chars().count() > max_len {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {max_len} characters."),
            );
            return None;
        }
        Some(text)
    }

    /// Optional list of primary keys; numeric strings are accepted
    ///
    /// Whether the keys exist is for the storage layer to decide.
    pub fn pk_list(&mut self, name: &str) -> Option<Vec<i64>> {
        let value = self.lookup(name, false)?;
        let Value::Array(items) = value else {
            self.errors.add(
                name,
                format!(
                    "Expected a list of items but got type \"{}\".",
                    json_type_name(value)
                ),
            );
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let pk = match item {
                Value::Number(_) | Value::String(_) => parse_integer(item),
                _ => None,
            };
            let Some(pk) = pk else {
                self.errors.add(
                    name,
                    format!(
                        "Incorrect type. Expected pk value, received {}.",
                        json_type_name(item)
                    ),
                );
                return None;
            };
            if !out.contains(&pk) {
                out.push(pk);
            }
        }
        Some(out)
    }

    // ── Numbers ─────────────────────────────────────────────────────

    /// Required 32-bit signed integer; numeric strings are accepted
    pub fn integer(&mut self, name: &str) -> Option<i32> {
        let value = self.lookup(name, true)?;
        let Some(parsed) = parse_integer(value) else {
            self.errors.add(name, INVALID_INTEGER);
            return None;
        };
        if parsed > i64::from(i32::MAX) {
            self.errors.add(
                name,
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
            return None;
        }
        if parsed < i64::from(i32::MIN) {
            self.errors.add(
                name,
                format!("Ensure this value is greater than or equal to {}.", i32::MIN),
            );
            return None;
        }
        i32::try_from(parsed).ok()
    }

    /// Required fixed-point decimal with precision limits
    pub fn decimal(&mut self, name: &str, max_digits: u32, decimal_places: u32) -> Option<Decimal> {
        let value = self.lookup(name, true)?;
        let Some(parsed) = parse_decimal(value) else {
            self.errors.add(name, INVALID_NUMBER);
            return None;
        };

        let (digits, decimals) = precision(&parsed);
        let whole_digits = digits - decimals;
        let message = if digits > max_digits {
            Some(format!(
                "Ensure that there are no more than {max_digits} digits in total."
            ))
        } else if decimals > decimal_places {
            Some(format!(
                "Ensure that there are no more than {decimal_places} decimal places."
            ))
        } else if whole_digits > max_digits - decimal_places {
            Some(format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max_digits - decimal_places
            ))
        } else {
            None
        };

        match message {
            Some(message) => {
                self.errors.add(name, message);
                None
            }
            None => Some(parsed),
        }
    }

    // ── Time ────────────────────────────────────────────────────────

    /// Required timestamp; offsets are converted, naive values read as UTC
    pub fn datetime(&mut self, name: &str) -> Option<DateTime<Utc>> {
        let value = self.lookup(name, true)?;
        let parsed = value.as_str().and_then(|s| parse_datetime(s.trim()));
        if parsed.is_none() {
            self.errors.add(name, INVALID_DATETIME);
        }
        parsed
    }
}

fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            // "12.000" is still an integer
            let s = match s.split_once('.') {
                Some((int, frac)) if frac.chars().all(|c| c == '0') => int,
                _ => s,
            };
            s.parse().ok()
        }
        _ => None,
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// (total digits, decimal places) counted the way the precision messages expect
fn precision(value: &Decimal) -> (u32, u32) {
    let scale = value.scale();
    let mantissa = value.mantissa().unsigned_abs();
    let significant = if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    };
    if scale > significant {
        (scale, scale)
    } else {
        (significant, scale)
    }
}

/// `YYYY-MM-DD[T ]hh:mm[:ss[.ffffff]][Z|±HH[:MM]|±HHMM]`
///
/// Values without an offset are UTC. Fractions are truncated to
/// microseconds.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let (local, offset) = split_offset(text)?;
    let local = truncate_fraction(local.trim_end())?;
    let naive = LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&local, fmt).ok())?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Split a trailing `Z` or numeric offset from the local part
fn split_offset(text: &str) -> Option<(&str, FixedOffset)> {
    if let Some(local) = text.strip_suffix('Z') {
        return Some((local, FixedOffset::east_opt(0)?));
    }
    // The date part holds dashes of its own; an offset can only follow the time
    let time_start = text.find(['T', ' '])?;
    let Some(sign_at) = text[time_start..]
        .rfind(['+', '-'])
        .map(|i| i + time_start)
    else {
        return Some((text, FixedOffset::east_opt(0)?));
    };

    let raw = &text[sign_at + 1..];
    if !raw.is_ascii() {
        return None;
    }
    let (hours, minutes) = match raw.len() {
        2 => (raw, "00"),
        4 => (&raw[..2], &raw[2..]),
        5 if raw.as_bytes()[2] == b':' => (&raw[..2], &raw[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    let seconds = hours * 3600 + minutes * 60;
    let offset = if text[sign_at..].starts_with('-') {
        FixedOffset::west_opt(seconds)?
    } else {
        FixedOffset::east_opt(seconds)?
    };
    Some((&text[..sign_at], offset))
}

/// Keep at most six fraction digits; `,` is accepted as the separator
fn truncate_fraction(local: &str) -> Option<String> {
    let Some(sep) = local.rfind(['.', ',']) else {
        return Some(local.to_string());
    };
    let fraction = &local[sep + 1..];
    if fraction.is_empty()
        || fraction.len() > MAX_FRACTION_DIGITS
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let kept = &fraction[..fraction.len().min(KEPT_FRACTION_DIGITS)];
    Some(format!("{}.{}", &local[..sep], kept))
}
