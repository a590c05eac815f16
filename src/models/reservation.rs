use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const PROPERTY_ID_FIELD: &str = "apartmentId";

/// Booking form submission. The widget's usual fields are named for readability, anything
/// else the client sends is carried along untouched.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub adults: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub children: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `None` only when the field is absent, an explicit `null` is kept as `Some(Value::Null)`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl ReservationRequest {
    /// Body sent to Smoobu: every client field, then the configured apartment id, which
    /// always wins over a client supplied one. Without a configured id the client's body
    /// goes out as is and Smoobu decides.
    pub fn into_upstream_payload(self, property_id: Option<&str>) -> Value {
        let mut payload = match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };
        if let Some(property_id) = property_id {
            payload.insert(
                PROPERTY_ID_FIELD.to_string(),
                Value::String(property_id.to_string()),
            );
        }
        Value::Object(payload)
    }
}
