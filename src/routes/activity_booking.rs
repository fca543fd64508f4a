use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::app_database;
use crate::models::activity::Activity;
use crate::models::activity_booking::{ActivityBooking, BookingInput, BookingUpdate};
use crate::services::booking_service::{self, BookingRejection};

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    upcoming: Option<bool>,
}

pub async fn add_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let today = Utc::now().date_naive();
    let mut booking = match booking_service::validate_booking(&input, today) {
        Ok(booking) => booking,
        Err(BookingRejection::MissingFields(missing_fields)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "All fields are required",
                "missingFields": missing_fields
            }));
        }
        Err(BookingRejection::InvalidFields(errors)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Booking validation failed",
                "errors": errors
            }));
        }
        Err(BookingRejection::PastDate) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "You cannot book a past date!"
            }));
        }
    };

    // The reference must point at a real activity at booking time.
    let activities: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    match activities.find_one(doc! { "_id": booking.activity_id }).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Activity not found"
            }));
        }
        Err(err) => {
            eprintln!("Failed to look up activity: {:?}", err);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to add booking",
                "error": err.to_string()
            }));
        }
    }

    let collection: mongodb::Collection<ActivityBooking> =
        app_database(&client).collection("activitybookings");

    match collection.insert_one(&booking).await {
        Ok(insert_result) => {
            booking.id = insert_result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "message": "Booking added successfully",
                "booking": booking
            }))
        }
        Err(err) => {
            eprintln!("Failed to create booking: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to add booking",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn get_bookings(
    data: web::Data<Arc<Client>>,
    query: web::Query<BookingListQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<ActivityBooking> =
        app_database(&client).collection("activitybookings");

    let bookings = match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<ActivityBooking>>().await {
            Ok(bookings) => bookings,
            Err(err) => {
                eprintln!("Failed to collect bookings: {:?}", err);
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Failed to retrieve bookings",
                    "error": err.to_string()
                }));
            }
        },
        Err(err) => {
            eprintln!("Failed to find bookings: {:?}", err);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to retrieve bookings",
                "error": err.to_string()
            }));
        }
    };

    match ActivityBooking::populate_all(bookings, &client).await {
        Ok(populated) => {
            let populated = if query.upcoming.unwrap_or(false) {
                booking_service::upcoming_only(populated, Utc::now().date_naive())
            } else {
                populated
            };
            HttpResponse::Ok().json(serde_json::json!({ "bookings": populated }))
        }
        Err(err) => {
            eprintln!("Failed to resolve booking activities: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to retrieve bookings",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn get_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let booking_id = path.into_inner();

    let booking_object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid booking ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid booking ID format"
            }));
        }
    };

    let collection: mongodb::Collection<ActivityBooking> =
        app_database(&client).collection("activitybookings");

    match collection.find_one(doc! { "_id": booking_object_id }).await {
        Ok(Some(booking)) => HttpResponse::Ok().json(serde_json::json!({ "booking": booking })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Booking not found"
        })),
        Err(e) => {
            eprintln!("Error fetching booking: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to fetch booking",
                "error": e.to_string()
            }))
        }
    }
}

pub async fn update_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<BookingUpdate>,
) -> impl Responder {
    let client = data.into_inner();
    let booking_id = path.into_inner();
    let update = input.into_inner();

    let booking_object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid booking ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid booking ID format"
            }));
        }
    };

    if update.guest_name.is_none()
        && update.email.is_none()
        && update.phone_number.is_none()
        && update.no_of_passengers.is_none()
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "At least one field must be provided"
        }));
    }

    if let Err(errors) = booking_service::validate_booking_update(&update) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Booking validation failed",
            "errors": errors
        }));
    }

    let mut update_doc = doc! {};

    if let Some(guest_name) = update.guest_name {
        update_doc.insert("guestName", guest_name.trim());
    }
    if let Some(email) = update.email {
        update_doc.insert("email", email.trim());
    }
    if let Some(phone_number) = update.phone_number {
        update_doc.insert("phoneNumber", phone_number.trim());
    }
    if let Some(no_of_passengers) = update.no_of_passengers {
        update_doc.insert("noOfPassengers", no_of_passengers as i32);
    }

    let collection: mongodb::Collection<ActivityBooking> =
        app_database(&client).collection("activitybookings");

    let filter = doc! { "_id": booking_object_id };

    match collection
        .update_one(filter.clone(), doc! { "$set": update_doc })
        .await
    {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Booking not found"
                }));
            }
            match collection.find_one(filter).await {
                Ok(Some(booking)) => HttpResponse::Ok().json(serde_json::json!({
                    "message": "Booking updated successfully",
                    "booking": booking
                })),
                Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Booking not found"
                })),
                Err(err) => {
                    eprintln!("Failed to reload booking: {:?}", err);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "message": "Failed to update booking",
                        "error": err.to_string()
                    }))
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to update booking: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to update booking",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn delete_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let booking_id = path.into_inner();

    let booking_object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid booking ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid booking ID format"
            }));
        }
    };

    let collection: mongodb::Collection<ActivityBooking> =
        app_database(&client).collection("activitybookings");

    match collection.delete_one(doc! { "_id": booking_object_id }).await {
        Ok(result) => {
            if result.deleted_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Booking not found"
                }));
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Booking deleted successfully"
            }))
        }
        Err(err) => {
            eprintln!("Failed to delete booking: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to delete booking",
                "error": err.to_string()
            }))
        }
    }
}
