use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "0.0.0.0")]
    pub host: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    /// Base url of the Smoobu booking API
    #[clap(env, long, default_value = "https://login.smoobu.com/api")]
    pub smoobu_api_url: String,

    #[clap(env, long)]
    pub smoobu_api_key: Option<String>,

    /// Smoobu apartment id this deployment books against
    #[clap(env, long)]
    pub house_id: Option<String>,

    /// iCal export of the apartment's occupancy
    #[clap(env, long)]
    pub ical_url: Option<String>,

    #[clap(env, long, default_value = "https://api.resend.com")]
    pub email_api_url: String,

    #[clap(env, long)]
    pub email_api_key: Option<String>,

    #[clap(env, long)]
    pub admin_email: Option<String>,

    /// Must be a sender address verified with the email provider
    #[clap(env, long)]
    pub sender_email: Option<String>,

    #[clap(env, long, default_value = "Réservations")]
    pub sender_name: String,
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            smoobu_api_url: "http://127.0.0.1:9".to_string(),
            smoobu_api_key: Some("test-api-key".to_string()),
            house_id: Some("424242".to_string()),
            ical_url: Some("http://127.0.0.1:9/calendar.ics".to_string()),
            email_api_url: "http://127.0.0.1:9".to_string(),
            email_api_key: Some("test-email-key".to_string()),
            admin_email: Some("admin@example.com".to_string()),
            sender_email: Some("noreply@example.com".to_string()),
            sender_name: "Réservations".to_string(),
        }
    }
}
