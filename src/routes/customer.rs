use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use regex::Regex;
use std::sync::Arc;

use crate::db::mongo::app_database;
use crate::models::customer::{Customer, CustomerInput, Title, TravellingForWork};
use crate::services::booking_service::is_valid_email;

/// Contact-details submission taken at room-booking time. The checks run in
/// the historic order: presence, email match, phone shape, email shape. The
/// stored phone gains the +94 prefix; `travellingForWork` defaults to No.
pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<CustomerInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let title = input.title.as_deref().unwrap_or_default().trim();
    let first_name = input.first_name.as_deref().unwrap_or_default().trim();
    let last_name = input.last_name.as_deref().unwrap_or_default().trim();
    let email = input.email.as_deref().unwrap_or_default().trim();
    let confirm_email = input.confirm_email.as_deref().unwrap_or_default().trim();
    let phone = input.phone.as_deref().unwrap_or_default().trim();

    if title.is_empty()
        || first_name.is_empty()
        || last_name.is_empty()
        || email.is_empty()
        || confirm_email.is_empty()
        || phone.is_empty()
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "All fields are required"
        }));
    }

    if email != confirm_email {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Email addresses do not match"
        }));
    }

    let phone_re = Regex::new(r"^\d{9}$").unwrap();
    if !phone_re.is_match(phone) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Phone number must be 9 digits"
        }));
    }

    if !is_valid_email(email) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid email format"
        }));
    }

    let title = match Title::parse(title) {
        Some(title) => title,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid title"
            }));
        }
    };

    let travelling_for_work = match input.travelling_for_work.as_deref() {
        None | Some("") => TravellingForWork::default(),
        Some(value) => match TravellingForWork::parse(value) {
            Some(answer) => answer,
            None => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid travellingForWork value"
                }));
            }
        },
    };

    let mut customer = Customer {
        id: None,
        travelling_for_work,
        title,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: format!("+94{}", phone),
        created_at: Utc::now(),
    };

    let collection: mongodb::Collection<Customer> =
        app_database(&client).collection("customers");

    match collection.insert_one(&customer).await {
        Ok(insert_result) => {
            customer.id = insert_result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "message": "Booking confirmed successfully",
                "bookingId": customer.id
            }))
        }
        Err(err) => {
            eprintln!("Failed to save customer booking: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

pub async fn get_booking_list(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Customer> =
        app_database(&client).collection("customers");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Customer>>().await {
            Ok(customers) => HttpResponse::Ok().json(customers),
            Err(err) => {
                eprintln!("Failed to collect customer bookings: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find customer bookings: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}
