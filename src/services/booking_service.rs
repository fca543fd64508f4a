use bson::oid::ObjectId;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;

use crate::models::activity_booking::{
    ActivityBooking, BookingInput, BookingUpdate, PopulatedBooking,
};

/// Why a booking submission was turned away. `PastDate` is kept separate from
/// the field map so clients can tell it apart from malformed input.
#[derive(Debug, PartialEq)]
pub enum BookingRejection {
    MissingFields(Vec<&'static str>),
    InvalidFields(HashMap<&'static str, String>),
    PastDate,
}

/// Validate a booking submission against `today` (injected, never read from
/// the clock here). Returns a record ready for insertion, or the first
/// applicable rejection: absent fields, then malformed fields collected as a
/// field-to-message map, then the past-date rule. A date equal to `today` is
/// accepted. The submission is rejected as a whole; nothing partial survives.
///
/// Whether `activityId` references a real activity is the caller's problem;
/// this function never touches the database.
pub fn validate_booking(
    input: &BookingInput,
    today: NaiveDate,
) -> Result<ActivityBooking, BookingRejection> {
    let missing = missing_fields(input);
    if !missing.is_empty() {
        return Err(BookingRejection::MissingFields(missing));
    }

    let mut errors: HashMap<&'static str, String> = HashMap::new();

    let guest_name = input.guest_name.as_deref().unwrap_or_default().trim();
    if !is_valid_guest_name(guest_name) {
        errors.insert(
            "guestName",
            "Guest name may only contain letters and spaces".to_string(),
        );
    }

    let email = input.email.as_deref().unwrap_or_default().trim();
    if !is_valid_email(email) {
        errors.insert("email", "Enter a valid email address".to_string());
    }

    let phone_number = input.phone_number.as_deref().unwrap_or_default().trim();
    if !is_valid_phone(phone_number) {
        errors.insert(
            "phoneNumber",
            "Phone number must be 10 to 15 digits, with an optional leading +".to_string(),
        );
    }

    let passengers = input.no_of_passengers.unwrap_or_default();
    if !(1..=i32::MAX as i64).contains(&passengers) {
        errors.insert(
            "noOfPassengers",
            "At least one passenger is required".to_string(),
        );
    }

    let date = match parse_booking_date(input.date.as_deref().unwrap_or_default()) {
        Some(date) => Some(date),
        None => {
            errors.insert("date", "Date must be a valid YYYY-MM-DD date".to_string());
            None
        }
    };

    let activity_id = match ObjectId::parse_str(input.activity_id.as_deref().unwrap_or_default()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.insert("activityId", "Invalid activity id format".to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(BookingRejection::InvalidFields(errors));
    }

    let date = date.expect("date validated above");
    if date < today {
        return Err(BookingRejection::PastDate);
    }

    Ok(ActivityBooking {
        id: None,
        guest_name: guest_name.to_string(),
        email: email.to_string(),
        phone_number: phone_number.to_string(),
        no_of_passengers: passengers as i32,
        date,
        activity_id: activity_id.expect("activity id validated above"),
    })
}

/// Validate the fields present in a partial booking update. An empty update
/// is the caller's concern; here only provided values are checked, with the
/// same rules the create path applies.
pub fn validate_booking_update(
    update: &BookingUpdate,
) -> Result<(), HashMap<&'static str, String>> {
    let mut errors: HashMap<&'static str, String> = HashMap::new();

    if let Some(guest_name) = update.guest_name.as_deref() {
        if !is_valid_guest_name(guest_name.trim()) {
            errors.insert(
                "guestName",
                "Guest name may only contain letters and spaces".to_string(),
            );
        }
    }
    if let Some(email) = update.email.as_deref() {
        if !is_valid_email(email.trim()) {
            errors.insert("email", "Enter a valid email address".to_string());
        }
    }
    if let Some(phone_number) = update.phone_number.as_deref() {
        if !is_valid_phone(phone_number.trim()) {
            errors.insert(
                "phoneNumber",
                "Phone number must be 10 to 15 digits, with an optional leading +".to_string(),
            );
        }
    }
    if let Some(passengers) = update.no_of_passengers {
        if !(1..=i32::MAX as i64).contains(&passengers) {
            errors.insert(
                "noOfPassengers",
                "At least one passenger is required".to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The admin booking list hides entries whose date has passed. This is a
/// view policy only: past bookings stay stored and are returned whenever the
/// caller does not ask for the cut.
pub fn upcoming_only(bookings: Vec<PopulatedBooking>, today: NaiveDate) -> Vec<PopulatedBooking> {
    bookings
        .into_iter()
        .filter(|booking| booking.date >= today)
        .collect()
}

fn missing_fields(input: &BookingInput) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if blank(&input.guest_name) {
        missing.push("guestName");
    }
    if blank(&input.email) {
        missing.push("email");
    }
    if blank(&input.phone_number) {
        missing.push("phoneNumber");
    }
    if input.no_of_passengers.is_none() {
        missing.push("noOfPassengers");
    }
    if blank(&input.date) {
        missing.push("date");
    }
    if blank(&input.activity_id) {
        missing.push("activityId");
    }
    missing
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn parse_booking_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn is_valid_guest_name(name: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z ]+$").unwrap();
    !name.is_empty() && re.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.unwrap().is_match(email)
}

fn is_valid_phone(phone: &str) -> bool {
    let re = Regex::new(r"^\+?\d{10,15}$").unwrap();
    re.is_match(phone)
}
