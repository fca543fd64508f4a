use std::{env, fs};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use ceylonstays_api::db;
use ceylonstays_api::routes;
use ceylonstays_api::services::image_service::{ImageStore, ImageStores};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8000;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_url = env::var("MONGODB_URL").expect("MONGODB_URL must be set");
    println!("Got MongoDB URL, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_url).await;
    println!("MongoDB connection established");

    let public_url =
        env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));
    let images_dir = env::var("IMAGES_DIR").unwrap_or_else(|_| "public/images".to_string());
    let blog_images_dir = env::var("BLOG_IMAGES_DIR").unwrap_or_else(|_| "BlogImages".to_string());

    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&blog_images_dir)?;

    let stores = ImageStores {
        gallery: ImageStore::new(&images_dir, public_url.clone(), "/images"),
        blogs: ImageStore::new(&blog_images_dir, public_url, "/BlogImages"),
    };

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(stores.clone()))
            .configure(routes::configure)
            .service(Files::new("/images", images_dir.clone()))
            .service(Files::new("/BlogImages", blog_images_dir.clone()))
    })
    .bind((host, port))?
    .run()
    .await
}
