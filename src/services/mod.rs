pub mod booking_service;
pub mod image_service;
pub mod room_search_service;
