use reqwest::Client;

use crate::config::Config;
use crate::helpers::ical_parser::parse_booked_events;
use crate::helpers::relay_error::RelayError;
use crate::models::calendar_event::CalendarEvent;

pub struct CalendarClient {
    http_client: Client,
    ical_url: Option<String>,
}

impl CalendarClient {
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            ical_url: config.ical_url.clone(),
        }
    }

    /// Downloads the feed and reads it from scratch, nothing is kept between calls.
    pub async fn fetch_booked_dates(&self) -> Result<Vec<CalendarEvent>, RelayError> {
        let url = self
            .ical_url
            .as_deref()
            .ok_or(RelayError::MissingConfig("ICAL_URL"))?;

        let transport_error = |source| RelayError::Transport {
            url: url.to_string(),
            source,
        };

        let document = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(transport_error)?
            .text()
            .await
            .map_err(transport_error)?;

        Ok(parse_booked_events(&document)?)
    }
}
