//! Booking Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::serializer::{FieldErrors, Fields};

pub const NAME_MAX_LEN: usize = 255;

/// Table reservation
///
/// No capacity or overlap rule exists: two bookings for the same slot are
/// both accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "No_of_guests")]
    pub no_of_guests: i32,
    #[serde(rename = "BookingDate")]
    pub booking_date: DateTime<Utc>,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} invitados - {}",
            self.name,
            self.no_of_guests,
            self.booking_date.format("%d/%m/%Y %H:%M")
        )
    }
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq)]
pub struct BookingInput {
    pub name: String,
    pub no_of_guests: i32,
    pub booking_date: DateTime<Utc>,
}

impl BookingInput {
    /// Validate a JSON payload; see [`crate::models::MenuItemInput::from_payload`]
    pub fn from_payload(payload: &Value, base: Option<&Booking>) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(payload, base.is_some())?;
        let name = fields.char_field("Name", NAME_MAX_LEN);
        let no_of_guests = fields.integer("No_of_guests");
        let booking_date = fields.datetime("BookingDate");

        let errors = fields.into_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let name = name.or_else(|| base.map(|b| b.name.clone()));
        let no_of_guests = no_of_guests.or_else(|| base.map(|b| b.no_of_guests));
        let booking_date = booking_date.or_else(|| base.map(|b| b.booking_date));
        match (name, no_of_guests, booking_date) {
            (Some(name), Some(no_of_guests), Some(booking_date)) => Ok(Self {
                name,
                no_of_guests,
                booking_date,
            }),
            _ => Err(errors),
        }
    }
}
