use actix_cors::Cors;
use actix_web::{body::MessageBody, middleware::Logger, web, App};
use mongodb::options::ClientOptions;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use ceylonstays_api::routes;
use ceylonstays_api::services::image_service::{ImageStore, ImageStores};

/// Test harness around the production route table. The Mongo client points
/// at a port nothing listens on with a short selection timeout: handlers
/// that reject before touching the database answer instantly, and anything
/// that does reach it fails fast instead of hanging the test run.
pub struct TestApp {
    pub client: Arc<mongodb::Client>,
    pub stores: ImageStores,
    // Held so the store directories outlive the test.
    _images_dir: TempDir,
    blog_images_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:59999/ceylonstays_test")
            .await
            .expect("static test URI parses");
        options.server_selection_timeout = Some(Duration::from_millis(300));
        options.connect_timeout = Some(Duration::from_millis(300));

        let client = Arc::new(
            mongodb::Client::with_options(options).expect("client builds from parsed options"),
        );

        let images_dir = TempDir::new().expect("temp image dir");
        let blog_images_dir = TempDir::new().expect("temp blog image dir");

        let stores = ImageStores {
            gallery: ImageStore::new(images_dir.path(), "http://localhost:8000", "/images"),
            blogs: ImageStore::new(
                blog_images_dir.path(),
                "http://localhost:8000",
                "/BlogImages",
            ),
        };

        Self {
            client,
            stores,
            _images_dir: images_dir,
            blog_images_dir,
        }
    }

    // The middleware stack wraps the response body, so the body type is
    // left opaque rather than pinned to BoxBody.
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(self.stores.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }

    pub fn blog_dir(&self) -> &std::path::Path {
        self.blog_images_dir.path()
    }
}

/// Hand-rolled multipart/form-data body for upload endpoints.
/// `fields` are plain text parts; `files` are (field name, file name,
/// content type, bytes).
pub fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, file_name, content_type, bytes) in files {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

pub fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={}", boundary)
}
