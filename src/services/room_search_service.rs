use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::room::Room;

/// Query parameters for the room search. Every criterion is optional; an
/// empty query matches everything.
#[derive(Debug, Default, Deserialize)]
pub struct RoomSearchParams {
    #[serde(rename = "checkIn")]
    pub check_in: Option<NaiveDate>,
    #[serde(rename = "checkOut")]
    pub check_out: Option<NaiveDate>,
    pub guests: Option<i32>,
    pub district: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
}

/// A room is free for a stay when the requested span overlaps none of its
/// recorded bookings. Spans that merely touch at a boundary do not overlap:
/// checking in on another guest's check-out day is allowed.
pub fn room_is_free(room: &Room, check_in: NaiveDate, check_out: NaiveDate) -> bool {
    room.currentbookings
        .iter()
        .all(|span| check_out <= span.check_in_date || check_in >= span.check_out_date)
}

/// Apply the search criteria to a room list, preserving the incoming order.
/// The availability criterion only applies when both dates are present;
/// `guests` defaults to 1, price bounds are inclusive and the district match
/// ignores case.
pub fn filter_rooms(rooms: Vec<Room>, params: &RoomSearchParams) -> Vec<Room> {
    let guests = params.guests.unwrap_or(1);

    rooms
        .into_iter()
        .filter(|room| {
            if let Some(min) = params.min_price {
                if room.rentperday < min {
                    return false;
                }
            }
            if let Some(max) = params.max_price {
                if room.rentperday > max {
                    return false;
                }
            }
            if room.max_count < guests {
                return false;
            }
            if let Some(district) = params.district.as_deref() {
                if !room.location.eq_ignore_ascii_case(district.trim()) {
                    return false;
                }
            }
            if let (Some(check_in), Some(check_out)) = (params.check_in, params.check_out) {
                if !room_is_free(room, check_in, check_out) {
                    return false;
                }
            }
            true
        })
        .collect()
}
