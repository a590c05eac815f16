pub mod booking_email;
pub mod calendar_event;
pub mod reservation;
