//! Request bodies sent to the platform API
//!
//! Field names follow the backend's JSON contract (camelCase for hotels and
//! rooms). Each type has a `sample` constructor holding the data the
//! scenarios submit.

use super::endpoints::AccountKind;
use serde::{Deserialize, Serialize};

pub const SAMPLE_PASSWORD: &str = "SecurePass123!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl SignUpRequest {
    /// `testadmin` / `testguest` / `testowner` at sweetmanager.com
    pub fn sample(kind: AccountKind) -> Self {
        let username = format!("test{}", kind.as_str());
        Self {
            email: format!("{}@sweetmanager.com", username),
            username,
            password: SAMPLE_PASSWORD.to_string(),
            role: kind.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

impl SignInRequest {
    pub fn sample() -> Self {
        Self {
            username: "testuser".to_string(),
            password: SAMPLE_PASSWORD.to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            username: "invaliduser".to_string(),
            password: "wrongpassword".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHotelRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub stars: u8,
    pub amenities: Vec<String>,
}

impl CreateHotelRequest {
    pub fn sample() -> Self {
        Self {
            name: "Grand Plaza Hotel".to_string(),
            address: "123 Main Street".to_string(),
            city: "Lima".to_string(),
            country: "Peru".to_string(),
            stars: 5,
            amenities: amenities(&["WiFi", "Pool", "Spa"]),
        }
    }
}

/// Partial hotel update; absent fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHotelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl UpdateHotelRequest {
    pub fn sample() -> Self {
        Self {
            name: Some("Updated Grand Plaza Hotel".to_string()),
            address: Some("456 New Address".to_string()),
            amenities: Some(amenities(&["WiFi", "Pool", "Spa", "Gym"])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUpRoomRequest {
    pub hotel_id: String,
    pub room_number: String,
    pub floor: u32,
    pub type_room_id: String,
}

impl SetUpRoomRequest {
    pub fn sample() -> Self {
        Self {
            hotel_id: "test_hotel_id".to_string(),
            room_number: "101".to_string(),
            floor: 1,
            type_room_id: "suite_type_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub hotel_id: String,
    pub room_number: String,
    pub status: String,
}

impl CreateRoomRequest {
    pub fn sample() -> Self {
        Self {
            hotel_id: "test_hotel_id".to_string(),
            room_number: "202".to_string(),
            status: "available".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateRequest {
    pub state: String,
}

impl RoomStateRequest {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
        }
    }
}

fn amenities(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_up_sample_per_kind() {
        let owner = SignUpRequest::sample(AccountKind::Owner);
        assert_eq!(owner.username, "testowner");
        assert_eq!(owner.email, "testowner@sweetmanager.com");
        assert_eq!(owner.role, "owner");
    }

    #[test]
    fn test_room_payloads_use_camel_case() {
        let value = serde_json::to_value(SetUpRoomRequest::sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "hotelId": "test_hotel_id",
                "roomNumber": "101",
                "floor": 1,
                "typeRoomId": "suite_type_id"
            })
        );
    }

    #[test]
    fn test_hotel_update_skips_absent_fields() {
        let update = UpdateHotelRequest {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({"name": "Renamed"}));

        let sample = serde_json::to_value(UpdateHotelRequest::sample()).unwrap();
        assert_eq!(sample["amenities"].as_array().unwrap().len(), 4);
    }
}
