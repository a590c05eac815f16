pub mod calendar_client;
pub mod email_client;
pub mod smoobu_client;
