use bson::{doc, oid::ObjectId};
use chrono::NaiveDate;
use futures::stream::TryStreamExt;
use mongodb::{error::Error, Client, Collection};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::db::mongo::app_database;
use crate::models::activity::Activity;

/// A customer booking against an Activity. The wire keys are the historic
/// camelCase ones. `activityId` is a weak reference: deleting the activity
/// leaves the booking in place and reads fall back to a placeholder name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ActivityBooking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "guestName")]
    pub guest_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "noOfPassengers")]
    pub no_of_passengers: i32,
    pub date: NaiveDate,
    #[serde(rename = "activityId")]
    pub activity_id: ObjectId,
}

/// Raw booking submission. Every field is optional so the handler can report
/// exactly which required fields were absent instead of a generic parse error.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingInput {
    #[serde(rename = "guestName")]
    pub guest_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "noOfPassengers")]
    pub no_of_passengers: Option<i64>,
    pub date: Option<String>,
    #[serde(rename = "activityId")]
    pub activity_id: Option<String>,
}

/// Partial update payload; `date` and `activityId` are immutable once booked
/// and deliberately have no counterpart here.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingUpdate {
    #[serde(rename = "guestName")]
    pub guest_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "noOfPassengers")]
    pub no_of_passengers: Option<i64>,
}

/// The `{_id, name}` shape `activityId` is populated to in list responses.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActivityRef {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

/// A booking as the admin list consumes it: `activityId` resolved to the
/// referenced activity's display name.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PopulatedBooking {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "guestName")]
    pub guest_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "noOfPassengers")]
    pub no_of_passengers: i32,
    pub date: NaiveDate,
    #[serde(rename = "activityId")]
    pub activity: ActivityRef,
}

impl ActivityBooking {
    /// Resolve the activity references for a whole listing with a single
    /// `$in` query. Bookings whose activity has since been deleted keep
    /// their stored id and surface a placeholder name rather than failing
    /// the listing.
    pub async fn populate_all(
        bookings: Vec<ActivityBooking>,
        client: &Client,
    ) -> Result<Vec<PopulatedBooking>, Error> {
        let mut activity_ids = HashSet::new();
        for booking in &bookings {
            activity_ids.insert(booking.activity_id);
        }

        let activities_collection: Collection<Activity> =
            app_database(client).collection("activities");

        let ids: Vec<ObjectId> = activity_ids.into_iter().collect();
        let mut activities_map = HashMap::new();

        if !ids.is_empty() {
            let cursor = activities_collection
                .find(doc! { "_id": { "$in": ids } })
                .await?;

            let activities: Vec<Activity> = cursor.try_collect().await?;

            for activity in activities {
                if let Some(id) = activity.id {
                    activities_map.insert(id, activity);
                }
            }
        }

        let populated = bookings
            .into_iter()
            .map(|booking| PopulatedBooking::resolve(booking, &activities_map))
            .collect();

        Ok(populated)
    }
}

impl PopulatedBooking {
    /// Join one booking against the fetched activities. A dangling
    /// `activityId` keeps its stored id and surfaces a placeholder name.
    pub fn resolve(booking: ActivityBooking, activities: &HashMap<ObjectId, Activity>) -> Self {
        let activity = match activities.get(&booking.activity_id) {
            Some(activity) => ActivityRef {
                id: booking.activity_id,
                name: activity.name.clone(),
            },
            None => {
                println!(
                    "Warning: Activity not found: {}, using placeholder",
                    booking.activity_id
                );
                ActivityRef {
                    id: booking.activity_id,
                    name: "Unknown Activity".to_string(),
                }
            }
        };

        PopulatedBooking {
            id: booking.id.unwrap_or_else(ObjectId::new),
            guest_name: booking.guest_name,
            email: booking.email,
            phone_number: booking.phone_number,
            no_of_passengers: booking.no_of_passengers,
            date: booking.date,
            activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_for(activity_id: ObjectId) -> ActivityBooking {
        ActivityBooking {
            id: Some(ObjectId::new()),
            guest_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "0771234567".to_string(),
            no_of_passengers: 2,
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            activity_id,
        }
    }

    #[test]
    fn resolve_takes_the_activity_name_from_the_lookup() {
        let activity_id = ObjectId::new();
        let mut activities = HashMap::new();
        activities.insert(
            activity_id,
            Activity {
                id: Some(activity_id),
                name: "River Safari".to_string(),
                description: "Boat ride through the mangroves".to_string(),
                price: 199.99,
                image: None,
            },
        );

        let populated = PopulatedBooking::resolve(booking_for(activity_id), &activities);
        assert_eq!(populated.activity.name, "River Safari");
        assert_eq!(populated.activity.id, activity_id);
    }

    #[test]
    fn resolve_keeps_bookings_whose_activity_was_deleted() {
        let activity_id = ObjectId::new();
        let populated = PopulatedBooking::resolve(booking_for(activity_id), &HashMap::new());

        // The listing must not fail; the stale reference gets a placeholder
        assert_eq!(populated.activity.name, "Unknown Activity");
        assert_eq!(populated.activity.id, activity_id);
        assert_eq!(populated.guest_name, "Jane Doe");
    }

    #[test]
    fn booking_serializes_with_historic_wire_keys() {
        let booking = ActivityBooking {
            id: None,
            guest_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "+94771234567".to_string(),
            no_of_passengers: 2,
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            activity_id: ObjectId::new(),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert!(value.get("guestName").is_some());
        assert!(value.get("phoneNumber").is_some());
        assert!(value.get("noOfPassengers").is_some());
        assert_eq!(value["date"], "2099-01-01");
        // Pre-insert bookings must not serialize a null _id
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn populated_booking_nests_activity_reference() {
        let activity_id = ObjectId::new();
        let populated = PopulatedBooking {
            id: ObjectId::new(),
            guest_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "0771234567".to_string(),
            no_of_passengers: 1,
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            activity: ActivityRef {
                id: activity_id,
                name: "River Safari".to_string(),
            },
        };

        let value = serde_json::to_value(&populated).unwrap();
        assert_eq!(value["activityId"]["name"], "River Safari");
        assert_eq!(
            value["activityId"]["_id"]["$oid"],
            activity_id.to_hex(),
        );
    }

    #[test]
    fn input_tolerates_missing_fields() {
        let input: BookingInput = serde_json::from_str(r#"{"email":"jane@x.com"}"#).unwrap();
        assert!(input.guest_name.is_none());
        assert_eq!(input.email.as_deref(), Some("jane@x.com"));
        assert!(input.activity_id.is_none());
    }
}
