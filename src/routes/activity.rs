use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::app_database;
use crate::models::activity::Activity;
use crate::services::image_service::{ImageStore, ImageStores};

/// Multipart payload for creating or updating an activity. Fields are all
/// optional at the extractor level so the handlers can decide which ones a
/// given operation requires.
#[derive(Debug, MultipartForm)]
pub struct ActivityForm {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub price: Option<Text<f64>>,
    #[multipart(rename = "images", limit = "10MB")]
    pub image: Option<TempFile>,
}

fn absolutize(mut activity: Activity, store: &ImageStore) -> Activity {
    if let Some(image) = activity.image.take() {
        activity.image = Some(store.public_url(&image));
    }
    activity
}

pub async fn get_activities(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Activity>>().await {
            Ok(activities) => {
                if activities.is_empty() {
                    return HttpResponse::NotFound().json(serde_json::json!({
                        "message": "No activities found"
                    }));
                }
                let activities: Vec<Activity> = activities
                    .into_iter()
                    .map(|activity| absolutize(activity, &stores.gallery))
                    .collect();
                HttpResponse::Ok().json(serde_json::json!({ "activities": activities }))
            }
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Error fetching activities",
                    "error": err.to_string()
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Error fetching activities",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn get_activity(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let activity_id = path.into_inner();

    let activity_object_id = match ObjectId::parse_str(&activity_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid activity ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid activity ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    match collection.find_one(doc! { "_id": activity_object_id }).await {
        Ok(Some(activity)) => HttpResponse::Ok().json(serde_json::json!({
            "activity": absolutize(activity, &stores.gallery)
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Activity not found"
        })),
        Err(e) => {
            eprintln!("Error fetching activity: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Fetching activity failed",
                "error": e.to_string()
            }))
        }
    }
}

pub async fn add_activity(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    form: MultipartForm<ActivityForm>,
) -> impl Responder {
    let client = data.into_inner();
    let form = form.into_inner();

    let mut missing_fields = Vec::new();
    if form.name.is_none() {
        missing_fields.push("name");
    }
    if form.description.is_none() {
        missing_fields.push("description");
    }
    if form.price.is_none() {
        missing_fields.push("price");
    }
    if form.image.is_none() {
        missing_fields.push("images");
    }
    if !missing_fields.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "All fields are required",
            "missingFields": missing_fields
        }));
    }

    let staged = match &form.image {
        Some(file) => match stores.gallery.stage(file) {
            Ok(staged) => Some(staged),
            Err(e) => {
                eprintln!("Failed to store activity image: {}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        },
        None => None,
    };

    let mut activity = Activity {
        id: None,
        name: form.name.map(|t| t.into_inner()).unwrap_or_default(),
        description: form.description.map(|t| t.into_inner()).unwrap_or_default(),
        price: form.price.map(|t| t.into_inner()).unwrap_or_default(),
        image: staged.as_ref().map(|s| s.file_name().to_string()),
    };

    let collection: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    match collection.insert_one(&activity).await {
        Ok(insert_result) => {
            // The record owns the file now; stop the drop-time rollback.
            if let Some(staged) = staged {
                staged.commit();
            }
            activity.id = insert_result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "activity": absolutize(activity, &stores.gallery)
            }))
        }
        Err(err) => {
            eprintln!("Failed to create activity: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Unable to add activity",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn update_activity(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
    form: MultipartForm<ActivityForm>,
) -> impl Responder {
    let client = data.into_inner();
    let activity_id = path.into_inner();
    let form = form.into_inner();

    let activity_object_id = match ObjectId::parse_str(&activity_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid activity ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid activity ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    let filter = doc! { "_id": activity_object_id };

    let existing = match collection.find_one(filter.clone()).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Activity not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching activity: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Unable to update activity",
                "error": e.to_string()
            }));
        }
    };

    let mut update_doc = doc! {};

    if let Some(name) = &form.name {
        update_doc.insert("name", name.as_str());
    }
    if let Some(description) = &form.description {
        update_doc.insert("description", description.as_str());
    }
    if let Some(price) = &form.price {
        update_doc.insert("price", price.0);
    }

    if update_doc.is_empty() && form.image.is_none() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "At least one field must be provided"
        }));
    }

    let staged = match &form.image {
        Some(file) => match stores.gallery.stage(file) {
            Ok(staged) => Some(staged),
            Err(e) => {
                eprintln!("Failed to store activity image: {}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        },
        None => None,
    };

    if let Some(staged) = &staged {
        update_doc.insert("image", staged.file_name());
    }

    match collection
        .update_one(filter.clone(), doc! { "$set": update_doc })
        .await
    {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Activity not found"
                }));
            }

            // Only after the write sticks: keep the new file, drop the old.
            if let Some(staged) = staged {
                staged.commit();
                if let Some(old_image) = &existing.image {
                    stores.gallery.remove(old_image);
                }
            }

            match collection.find_one(filter).await {
                Ok(Some(activity)) => HttpResponse::Ok().json(serde_json::json!({
                    "activity": absolutize(activity, &stores.gallery)
                })),
                Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Activity not found"
                })),
                Err(err) => {
                    eprintln!("Failed to reload activity: {:?}", err);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "message": "Unable to update activity",
                        "error": err.to_string()
                    }))
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to update activity: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Unable to update activity",
                "error": err.to_string()
            }))
        }
    }
}

pub async fn delete_activity(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let activity_id = path.into_inner();

    let activity_object_id = match ObjectId::parse_str(&activity_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid activity ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid activity ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Activity> =
        app_database(&client).collection("activities");

    let existing = match collection
        .find_one(doc! { "_id": activity_object_id })
        .await
    {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Unable to delete activity"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching activity: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Error deleting activity",
                "error": e.to_string()
            }));
        }
    };

    match collection
        .delete_one(doc! { "_id": activity_object_id })
        .await
    {
        Ok(result) => {
            if result.deleted_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Unable to delete activity"
                }));
            }
            if let Some(image) = &existing.image {
                stores.gallery.remove(image);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Activity deleted successfully"
            }))
        }
        Err(err) => {
            eprintln!("Failed to delete activity: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Error deleting activity",
                "error": err.to_string()
            }))
        }
    }
}
