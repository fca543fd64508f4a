pub mod activity;
pub mod activity_booking;
pub mod blog;
pub mod customer;
pub mod room;
