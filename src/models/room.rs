use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One occupied interval of a room: [checkInDate, checkOutDate].
/// Day granularity; overlap between spans is not enforced at write time,
/// only screened by the availability filter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BookingSpan {
    #[serde(rename = "checkInDate")]
    pub check_in_date: NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out_date: NaiveDate,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Feedback {
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub message: String,
}

/// A room document. Field keys follow the historic schema exactly, including
/// its lowercase mushed names (`rentperday`, `imageurl`, `currentbookings`).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Room {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(rename = "maxCount")]
    pub max_count: i32,
    pub phonenumber: i64,
    pub rentperday: f64,
    #[serde(default)]
    pub imageurl: Vec<String>,
    #[serde(default)]
    pub currentbookings: Vec<BookingSpan>,
    #[serde(rename = "type")]
    pub room_type: String,
    pub description: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_beds")]
    pub beds: i32,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: i32,
    #[serde(default = "default_sleeps")]
    pub sleeps: i32,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(rename = "ecoFriendly", default)]
    pub eco_friendly: bool,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
    #[serde(rename = "reviewsCount", default)]
    pub reviews_count: i32,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_location() -> String {
    "Not specified".to_string()
}

fn default_beds() -> i32 {
    1
}

fn default_bathrooms() -> i32 {
    1
}

fn default_sleeps() -> i32 {
    2
}

fn default_rating() -> f64 {
    4.0
}
