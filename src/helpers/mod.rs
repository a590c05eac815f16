pub mod handler_404;
pub mod ical_parser;
pub mod relay_error;
