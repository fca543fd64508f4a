use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::app_database;
use crate::models::room::Room;
use crate::services::image_service::{ImageStore, ImageStores};
use crate::services::room_search_service::{self, RoomSearchParams};

/// Multipart payload for creating or updating a room. `amenities` arrives as
/// a JSON array string (or a single plain value), `ecoFriendly` as
/// "true"/"false" text, both the historic admin-form conventions.
#[derive(Debug, MultipartForm)]
pub struct RoomForm {
    pub name: Option<Text<String>>,
    #[multipart(rename = "maxCount")]
    pub max_count: Option<Text<i32>>,
    pub phonenumber: Option<Text<i64>>,
    pub rentperday: Option<Text<f64>>,
    #[multipart(rename = "type")]
    pub room_type: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub location: Option<Text<String>>,
    pub beds: Option<Text<i32>>,
    pub bathrooms: Option<Text<i32>>,
    pub sleeps: Option<Text<i32>>,
    pub amenities: Option<Text<String>>,
    #[multipart(rename = "ecoFriendly")]
    pub eco_friendly: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub imageurl: Option<TempFile>,
}

fn absolutize(mut room: Room, store: &ImageStore) -> Room {
    let images = std::mem::take(&mut room.imageurl);
    room.imageurl = images
        .into_iter()
        .map(|image| store.public_url(&image))
        .collect();
    room
}

fn parse_amenities(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
    } else if trimmed.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![trimmed.to_string()])
    }
}

pub async fn get_rooms(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Room>>().await {
            Ok(rooms) => {
                let rooms: Vec<Room> = rooms
                    .into_iter()
                    .map(|room| absolutize(room, &stores.gallery))
                    .collect();
                HttpResponse::Ok().json(rooms)
            }
            Err(err) => {
                eprintln!("Failed to collect rooms: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Failed to fetch rooms",
                    "error": err.to_string()
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find rooms: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to fetch rooms",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn search_rooms(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    query: web::Query<RoomSearchParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Room>>().await {
            Ok(rooms) => {
                let matches = room_search_service::filter_rooms(rooms, &query);
                let matches: Vec<Room> = matches
                    .into_iter()
                    .map(|room| absolutize(room, &stores.gallery))
                    .collect();
                HttpResponse::Ok().json(matches)
            }
            Err(err) => {
                eprintln!("Failed to collect rooms: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Failed to fetch rooms",
                    "error": err.to_string()
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find rooms: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to fetch rooms",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn get_room(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let room_object_id = match ObjectId::parse_str(&room_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid room ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid room ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    match collection.find_one(doc! { "_id": room_object_id }).await {
        Ok(Some(room)) => HttpResponse::Ok().json(absolutize(room, &stores.gallery)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Room not found"
        })),
        Err(e) => {
            eprintln!("Error fetching room: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to fetch room",
                "error": e.to_string()
            }))
        }
    }
}

pub async fn add_room(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    form: MultipartForm<RoomForm>,
) -> impl Responder {
    let client = data.into_inner();
    let form = form.into_inner();

    let mut missing_fields = Vec::new();
    if form.name.is_none() {
        missing_fields.push("name");
    }
    if form.max_count.is_none() {
        missing_fields.push("maxCount");
    }
    if form.phonenumber.is_none() {
        missing_fields.push("phonenumber");
    }
    if form.rentperday.is_none() {
        missing_fields.push("rentperday");
    }
    if form.room_type.is_none() {
        missing_fields.push("type");
    }
    if form.description.is_none() {
        missing_fields.push("description");
    }
    if form.location.is_none() {
        missing_fields.push("location");
    }
    if !missing_fields.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "All fields are required",
            "missingFields": missing_fields
        }));
    }

    let amenities = match &form.amenities {
        Some(raw) => match parse_amenities(raw.as_str()) {
            Ok(amenities) => amenities,
            Err(e) => {
                eprintln!("Invalid amenities payload: {:?}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid amenities format"
                }));
            }
        },
        None => Vec::new(),
    };

    let staged = match &form.imageurl {
        Some(file) => match stores.gallery.stage(file) {
            Ok(staged) => Some(staged),
            Err(e) => {
                eprintln!("Failed to store room image: {}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        },
        None => None,
    };

    let now = Utc::now();
    let mut room = Room {
        id: None,
        name: form.name.map(|t| t.into_inner()).unwrap_or_default(),
        max_count: form.max_count.map(|t| t.0).unwrap_or_default(),
        phonenumber: form.phonenumber.map(|t| t.0).unwrap_or_default(),
        rentperday: form.rentperday.map(|t| t.0).unwrap_or_default(),
        imageurl: staged
            .as_ref()
            .map(|s| vec![s.file_name().to_string()])
            .unwrap_or_default(),
        currentbookings: Vec::new(),
        room_type: form.room_type.map(|t| t.into_inner()).unwrap_or_default(),
        description: form.description.map(|t| t.into_inner()).unwrap_or_default(),
        location: form.location.map(|t| t.into_inner()).unwrap_or_default(),
        beds: form.beds.map(|t| t.0).unwrap_or(1),
        bathrooms: form.bathrooms.map(|t| t.0).unwrap_or(1),
        sleeps: form.sleeps.map(|t| t.0).unwrap_or(2),
        rating: 4.0,
        amenities,
        eco_friendly: form
            .eco_friendly
            .map(|t| t.as_str() == "true")
            .unwrap_or(false),
        feedback: Vec::new(),
        reviews_count: 0,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    match collection.insert_one(&room).await {
        Ok(insert_result) => {
            if let Some(staged) = staged {
                staged.commit();
            }
            room.id = insert_result.inserted_id.as_object_id();
            HttpResponse::Created().json(absolutize(room, &stores.gallery))
        }
        Err(err) => {
            eprintln!("Failed to add room: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to add room",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn update_room(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
    form: MultipartForm<RoomForm>,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();
    let form = form.into_inner();

    let room_object_id = match ObjectId::parse_str(&room_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid room ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid room ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    let filter = doc! { "_id": room_object_id };

    let existing = match collection.find_one(filter.clone()).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Room not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching room: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to update room",
                "error": e.to_string()
            }));
        }
    };

    let mut update_doc = doc! {};

    if let Some(name) = &form.name {
        update_doc.insert("name", name.as_str());
    }
    if let Some(max_count) = &form.max_count {
        update_doc.insert("maxCount", max_count.0);
    }
    if let Some(phonenumber) = &form.phonenumber {
        update_doc.insert("phonenumber", phonenumber.0);
    }
    if let Some(rentperday) = &form.rentperday {
        update_doc.insert("rentperday", rentperday.0);
    }
    if let Some(room_type) = &form.room_type {
        update_doc.insert("type", room_type.as_str());
    }
    if let Some(description) = &form.description {
        update_doc.insert("description", description.as_str());
    }
    if let Some(location) = &form.location {
        update_doc.insert("location", location.as_str());
    }
    if let Some(beds) = &form.beds {
        update_doc.insert("beds", beds.0);
    }
    if let Some(bathrooms) = &form.bathrooms {
        update_doc.insert("bathrooms", bathrooms.0);
    }
    if let Some(sleeps) = &form.sleeps {
        update_doc.insert("sleeps", sleeps.0);
    }
    if let Some(raw) = &form.amenities {
        match parse_amenities(raw.as_str()) {
            Ok(amenities) => {
                update_doc.insert("amenities", amenities);
            }
            Err(e) => {
                eprintln!("Invalid amenities payload: {:?}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid amenities format"
                }));
            }
        }
    }
    if let Some(eco_friendly) = &form.eco_friendly {
        update_doc.insert("ecoFriendly", eco_friendly.as_str() == "true");
    }

    if update_doc.is_empty() && form.imageurl.is_none() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "At least one field must be provided"
        }));
    }

    let staged = match &form.imageurl {
        Some(file) => match stores.gallery.stage(file) {
            Ok(staged) => Some(staged),
            Err(e) => {
                eprintln!("Failed to store room image: {}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        },
        None => None,
    };

    if let Some(staged) = &staged {
        update_doc.insert("imageurl", vec![staged.file_name()]);
    }
    update_doc.insert("updatedAt", Utc::now().to_rfc3339());

    match collection
        .update_one(filter.clone(), doc! { "$set": update_doc })
        .await
    {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Room not found"
                }));
            }

            if let Some(staged) = staged {
                staged.commit();
                for old_image in &existing.imageurl {
                    stores.gallery.remove(old_image);
                }
            }

            match collection.find_one(filter).await {
                Ok(Some(room)) => HttpResponse::Ok().json(absolutize(room, &stores.gallery)),
                Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Room not found"
                })),
                Err(err) => {
                    eprintln!("Failed to reload room: {:?}", err);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "message": "Failed to update room",
                        "error": err.to_string()
                    }))
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to update room: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to update room",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn delete_room(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let room_object_id = match ObjectId::parse_str(&room_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid room ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid room ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Room> = app_database(&client).collection("rooms");

    let existing = match collection.find_one(doc! { "_id": room_object_id }).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Room not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching room: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to delete room",
                "error": e.to_string()
            }));
        }
    };

    match collection.delete_one(doc! { "_id": room_object_id }).await {
        Ok(result) => {
            if result.deleted_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Room not found"
                }));
            }
            for image in &existing.imageurl {
                stores.gallery.remove(image);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Room deleted successfully"
            }))
        }
        Err(err) => {
            eprintln!("Failed to delete room: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to delete room",
                "error": err.to_string()
            }))
        }
    }
}
