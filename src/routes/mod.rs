use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};

pub mod activity;
pub mod activity_booking;
pub mod blog;
pub mod customer;
pub mod health;
pub mod room;

/// Extractor failures never reach a handler, so left alone they answer in
/// actix's plain-text default. Wrap them in the same JSON envelope the
/// handlers use.
fn extractor_rejection<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let body = serde_json::json!({ "message": err.to_string() });
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// The whole REST surface, shared by `main` and the integration tests.
/// `/api/rooms/search` must stay registered ahead of `/api/rooms/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| extractor_rejection(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| extractor_rejection(err)))
        .app_data(
            MultipartFormConfig::default().error_handler(|err, _req| extractor_rejection(err)),
        )
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/activitybookings")
                .route("", web::post().to(activity_booking::add_booking))
                .route("", web::get().to(activity_booking::get_bookings))
                .route("/{id}", web::get().to(activity_booking::get_booking))
                .route("/{id}", web::put().to(activity_booking::update_booking))
                .route("/{id}", web::delete().to(activity_booking::delete_booking)),
        )
        .service(
            web::scope("/activities")
                .route("", web::get().to(activity::get_activities))
                .route("", web::post().to(activity::add_activity))
                .route("/{id}", web::get().to(activity::get_activity))
                .route("/{id}", web::put().to(activity::update_activity))
                .route("/{id}", web::delete().to(activity::delete_activity)),
        )
        .service(
            web::scope("/api")
                .service(
                    web::scope("/rooms")
                        .route("", web::get().to(room::get_rooms))
                        .route("", web::post().to(room::add_room))
                        .route("/search", web::get().to(room::search_rooms))
                        .route("/{id}", web::get().to(room::get_room))
                        .route("/{id}", web::put().to(room::update_room))
                        .route("/{id}", web::delete().to(room::delete_room)),
                )
                .route("/bookings", web::post().to(customer::create_booking))
                .route("/bookinglist", web::get().to(customer::get_booking_list)),
        )
        .service(
            web::scope("/blogs")
                .route("/add", web::post().to(blog::add_blog))
                .route("", web::get().to(blog::get_blogs))
                .route(
                    "/category/{category}",
                    web::get().to(blog::get_blogs_by_category),
                )
                .route("/get/{id}", web::get().to(blog::get_blog))
                .route("/update/{id}", web::put().to(blog::update_blog))
                .route("/delete/{id}", web::delete().to(blog::delete_blog))
                .route("/rate/{id}", web::post().to(blog::rate_blog)),
        );
}
