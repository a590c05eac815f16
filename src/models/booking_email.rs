use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use time::format_description::well_known::Rfc3339;

use crate::helpers::relay_error::RelayError;

pub const BOOKING_EMAIL_SUBJECT: &str = "Nouvelle réservation";

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SHORT_DATE: &[FormatItem<'static>] = format_description!("[day]/[month]/[year]");

/// Fields of the booking form the admin notification is built from. Nothing is checked
/// while reading the body, any JSON type is accepted. Only the dates have to be readable,
/// and only once they are formatted.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingEmailRequest {
    #[serde(default)]
    pub first_name: Value,
    #[serde(default)]
    pub last_name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub arrival_date: Value,
    #[serde(default)]
    pub departure_date: Value,
    #[serde(default)]
    pub adults: Value,
    #[serde(default)]
    pub children: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub html: String,
}

impl BookingEmailRequest {
    pub fn to_notification(&self) -> Result<NotificationMessage, RelayError> {
        let arrival = short_date(&self.arrival_date)?;
        let departure = short_date(&self.departure_date)?;

        let html = format!(
            "<h2>Nouvelle réservation</h2>\
<p><strong>Nom :</strong> {} {}</p>\
<p><strong>Email :</strong> {}</p>\
<p><strong>Arrivée :</strong> {}</p>\
<p><strong>Départ :</strong> {}</p>\
<p><strong>Adultes :</strong> {}</p>\
<p><strong>Enfants :</strong> {}</p>",
            display(&self.first_name),
            display(&self.last_name),
            display(&self.email),
            arrival,
            departure,
            display(&self.adults),
            display(&self.children),
        );

        Ok(NotificationMessage {
            subject: BOOKING_EMAIL_SUBJECT.to_string(),
            html,
        })
    }
}

/// `2024-07-01`, a full RFC 3339 timestamp or epoch milliseconds, rendered as `01/07/2024`.
fn short_date(raw: &Value) -> Result<String, RelayError> {
    let invalid = || RelayError::InvalidDate(raw.to_string());

    let date = match raw {
        Value::String(text) => {
            let text = text.trim();
            Date::parse(text, ISO_DATE)
                .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(|timestamp| timestamp.date()))
                .map_err(|_| invalid())?
        }
        Value::Number(millis) => {
            let millis = millis.as_i64().ok_or_else(invalid)?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .map_err(|_| invalid())?
                .date()
        }
        _ => return Err(invalid()),
    };

    date.format(SHORT_DATE).map_err(|_| invalid())
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => escape_html(text),
        other => escape_html(&other.to_string()),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking() -> BookingEmailRequest {
        serde_json::from_value(json!({
            "firstName": "Camille",
            "lastName": "Martin",
            "email": "camille@example.com",
            "arrivalDate": "2024-07-01",
            "departureDate": "2024-07-08T00:00:00.000Z",
            "adults": 2,
            "children": "1",
        }))
        .unwrap()
    }

    #[test]
    fn test_every_field_is_interpolated() {
        let message = booking().to_notification().unwrap();

        assert_eq!(message.subject, "Nouvelle réservation");
        for expected in [
            "Camille Martin",
            "camille@example.com",
            "01/07/2024",
            "08/07/2024",
            "<strong>Adultes :</strong> 2",
            "<strong>Enfants :</strong> 1",
        ] {
            assert!(message.html.contains(expected), "missing {expected} in {}", message.html);
        }
    }

    #[test]
    fn test_markup_in_fields_is_escaped() {
        let mut request = booking();
        request.last_name = json!("<script>alert('x')</script>");

        let message = request.to_notification().unwrap();
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_unreadable_date_is_a_formatting_failure() {
        let mut request = booking();
        request.arrival_date = json!("le premier juillet");

        assert!(matches!(
            request.to_notification(),
            Err(RelayError::InvalidDate(value)) if value == "\"le premier juillet\""
        ));
    }

    #[test]
    fn test_missing_date_is_a_formatting_failure() {
        let mut request = booking();
        request.departure_date = Value::Null;
        assert!(request.to_notification().is_err());
    }

    #[test]
    fn test_epoch_millis_dates_are_formatted() {
        let mut request = booking();
        // 2024-07-01T00:00:00Z and 2024-07-08T00:00:00Z
        request.arrival_date = json!(1719792000000_i64);
        request.departure_date = json!(1720396800000_i64);

        let message = request.to_notification().unwrap();
        assert!(message.html.contains("01/07/2024"));
        assert!(message.html.contains("08/07/2024"));
    }

    #[test]
    fn test_non_date_types_are_a_formatting_failure() {
        let mut request = booking();
        request.arrival_date = json!({ "day": 1 });
        assert!(request.to_notification().is_err());

        request.arrival_date = json!(true);
        assert!(request.to_notification().is_err());
    }

    #[test]
    fn test_missing_text_fields_render_empty() {
        let request: BookingEmailRequest = serde_json::from_value(json!({
            "arrivalDate": "2024-07-01",
            "departureDate": "2024-07-08",
        }))
        .unwrap();

        let message = request.to_notification().unwrap();
        assert!(message.html.contains("<strong>Email :</strong> </p>"));
    }
}
