use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use mongodb::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

use crate::db::mongo::app_database;
use crate::services::image_service::{ImageStore, ImageStores};

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    client: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    let storage_result = check_image_storage(&stores);
    health
        .services
        .insert("image_storage".to_string(), storage_result.clone());

    // Any failing service degrades the overall status.
    if mongo_result.status != "ok" || storage_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

/// Upper bound on the health ping; the endpoint must answer promptly even
/// when the driver is stuck selecting a server.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    let db = app_database(client);
    let ping = db.run_command(doc! {"ping": 1});
    match timeout(PING_TIMEOUT, ping).await {
        Ok(Ok(_)) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Ok(Err(e)) => {
            eprintln!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
        Err(_) => {
            eprintln!("MongoDB health check timed out");

            ServiceStatus {
                status: "error".to_string(),
                details: Some("Ping timed out".to_string()),
            }
        }
    }
}

fn check_image_storage(stores: &ImageStores) -> ServiceStatus {
    let mut missing = Vec::new();

    if !store_is_ready(&stores.gallery) {
        missing.push(stores.gallery.root().display().to_string());
    }
    if !store_is_ready(&stores.blogs) {
        missing.push(stores.blogs.root().display().to_string());
    }

    if missing.is_empty() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("Image directories present".to_string()),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Missing image directories: {}", missing.join(", "))),
        }
    }
}

fn store_is_ready(store: &ImageStore) -> bool {
    store.root().is_dir()
}
