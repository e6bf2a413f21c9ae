use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Token endpoint response, kept exactly as decoded.
///
/// The body is stored whole, whatever its shape; the accessors read the
/// documented fields when they are present with the expected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRecord(Value);

impl TokenRecord {
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(Value::as_str)
    }

    pub fn token_type(&self) -> Option<&str> {
        self.0.get("token_type").and_then(Value::as_str)
    }

    /// Lifetime in seconds.
    pub fn expires_in(&self) -> Option<u64> {
        self.0.get("expires_in").and_then(Value::as_u64)
    }

    pub fn scope(&self) -> Option<&str> {
        self.0.get("scope").and_then(Value::as_str)
    }

    /// Unix epoch seconds.
    pub fn created_at(&self) -> Option<i64> {
        self.0.get("created_at").and_then(Value::as_i64)
    }

    /// When the token was issued. Informational only, expiry is never checked.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.created_at()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for TokenRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub count: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// api/v2/guestlists

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestlistResponse {
    pub data: Option<GuestlistData>,
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestlistData {
    pub guestlist: Option<Vec<GuestlistEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestlistEntry {
    pub id: Option<String>,
    pub token: Option<String>,
    pub state: Option<String>,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    pub buyer: Option<Person>,
    pub attendee: Option<Person>,
    pub ticket_type: Option<TicketType>,
    pub order: Option<Order>,
    pub listing: Option<ListingRef>,
    pub event: Option<EventRef>,
    /// Shape varies per event questionnaire.
    pub answers: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketType {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: Option<String>,
    pub discount_code: Option<String>,
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRef {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRef {
    pub id: Option<String>,
    pub start_stamp: Option<i64>,
    pub end_stamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// api/v2/current_user

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUserResponse {
    pub current_user: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// api/v2/listings

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingsResponse {
    pub listings: Option<Vec<ListingRef>>,
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_record_reads_documented_fields() {
        let body = json!({
            "access_token": "T1",
            "token_type": "Bearer",
            "expires_in": 2592000,
            "scope": "public",
            "created_at": 1558959578,
            "refresh_token": "R1"
        });

        let record: TokenRecord = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(record.access_token(), Some("T1"));
        assert_eq!(record.token_type(), Some("Bearer"));
        assert_eq!(record.expires_in(), Some(2592000));
        assert_eq!(record.scope(), Some("public"));
        assert_eq!(record.as_value()["refresh_token"], json!("R1"));
        assert_eq!(serde_json::to_value(&record).unwrap(), body);
        assert_eq!(
            record.issued_at().unwrap().to_rfc3339(),
            "2019-05-27T12:19:38+00:00"
        );
    }

    #[test]
    fn token_record_tolerates_any_shape() {
        let body = json!({ "access_token": 42, "expires_in": "soon" });
        let record: TokenRecord = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(record.access_token(), None);
        assert_eq!(record.expires_in(), None);
        assert_eq!(record.issued_at(), None);
        assert_eq!(record.into_value(), body);

        let record = TokenRecord::from(json!(["not", "an", "object"]));
        assert_eq!(record.access_token(), None);
    }

    #[test]
    fn guestlist_decodes_partial_entries() {
        let body = json!({
            "data": {
                "guestlist": [{
                    "id": "g1",
                    "state": "active",
                    "buyer": { "email": "a@b.c", "name": "A", "id": "u1" },
                    "ticket_type": { "name": "GA", "price": 12.5, "id": "t1" },
                    "event": { "id": "e1", "start_stamp": 1558959578 },
                    "answers": [{ "name": "size", "value": "M" }]
                }]
            },
            "meta": { "count": 1, "limit": 100, "offset": 0 }
        });

        let response: GuestlistResponse = serde_json::from_value(body.clone()).unwrap();
        let entry = &response.data.as_ref().unwrap().guestlist.as_ref().unwrap()[0];
        assert_eq!(entry.buyer.as_ref().unwrap().email.as_deref(), Some("a@b.c"));
        assert_eq!(entry.ticket_type.as_ref().unwrap().price, Some(12.5));
        assert!(entry.attendee.is_none());
        assert_eq!(response.meta.as_ref().unwrap().count, Some(1));
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }

    #[test]
    fn response_views_keep_unknown_fields() {
        let body = json!({
            "current_user": { "id": "u1", "email": "e", "phone": "555" },
            "extra_top": 1
        });

        let response: CurrentUserResponse = serde_json::from_value(body.clone()).unwrap();
        let user = response.current_user.as_ref().unwrap();
        assert_eq!(user.extra.get("phone"), Some(&json!("555")));
        assert_eq!(response.extra.get("extra_top"), Some(&json!(1)));
        assert_eq!(serde_json::to_value(&response).unwrap(), body);

        let response: CurrentUserResponse =
            serde_json::from_value(json!({ "current_user": null })).unwrap();
        assert!(response.current_user.is_none());
    }
}
