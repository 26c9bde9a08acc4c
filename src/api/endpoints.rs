//! Endpoint templates of the SweetManager API
//!
//! Every request the suite makes is one of these variants. The variant knows
//! its method, path relative to the base URL, query string, whether it needs
//! a bearer token, and which statuses count as a pass.

use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// Kind of account created by a sign-up request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Admin,
    Guest,
    Owner,
}

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [AccountKind::Admin, AccountKind::Guest, AccountKind::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Admin => "admin",
            AccountKind::Guest => "guest",
            AccountKind::Owner => "owner",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(AccountKind::Admin),
            "guest" => Ok(AccountKind::Guest),
            "owner" => Ok(AccountKind::Owner),
            other => Err(format!("unknown account kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    SignUp(AccountKind),
    SignIn,
    CreateHotel,
    ListHotels,
    GetHotel(String),
    UpdateHotel(String),
    HotelsByOwner(String),
    SetUpRoom,
    CreateRoom,
    UpdateRoomState { room_id: String },
    GetRoomById(String),
    RoomsByState(String),
    AllRooms,
    RoomsByType(String),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::SignUp(_)
            | Endpoint::SignIn
            | Endpoint::CreateHotel
            | Endpoint::SetUpRoom
            | Endpoint::CreateRoom => Method::POST,
            Endpoint::UpdateHotel(_) | Endpoint::UpdateRoomState { .. } => Method::PUT,
            Endpoint::ListHotels
            | Endpoint::GetHotel(_)
            | Endpoint::HotelsByOwner(_)
            | Endpoint::GetRoomById(_)
            | Endpoint::RoomsByState(_)
            | Endpoint::AllRooms
            | Endpoint::RoomsByType(_) => Method::GET,
        }
    }

    /// Path relative to the API base, without a leading slash
    pub fn path(&self) -> String {
        match self {
            Endpoint::SignUp(kind) => format!("authentication/sign-up-{}", kind),
            Endpoint::SignIn => "authentication/sign-in".to_string(),
            Endpoint::CreateHotel | Endpoint::ListHotels => "hotels".to_string(),
            Endpoint::GetHotel(id) | Endpoint::UpdateHotel(id) => format!("hotels/{}", id),
            Endpoint::HotelsByOwner(owner) => format!("hotels/owner/{}", owner),
            Endpoint::SetUpRoom => "room/set-up".to_string(),
            Endpoint::CreateRoom => "room/create-room".to_string(),
            Endpoint::UpdateRoomState { .. } => "room/update-room-state".to_string(),
            Endpoint::GetRoomById(_) => "room/get-room-by-id".to_string(),
            Endpoint::RoomsByState(_) => "room/get-room-by-state".to_string(),
            Endpoint::AllRooms => "room/get-all-rooms".to_string(),
            Endpoint::RoomsByType(_) => "room/get-room-by-type-room".to_string(),
        }
    }

    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            Endpoint::UpdateRoomState { room_id } => Some(("roomId", room_id)),
            Endpoint::GetRoomById(id) => Some(("id", id)),
            Endpoint::RoomsByState(state) => Some(("state", state)),
            Endpoint::RoomsByType(kind) => Some(("typeRoom", kind)),
            _ => None,
        }
    }

    /// Endpoints the backend guards with a bearer token
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Endpoint::CreateHotel
                | Endpoint::UpdateHotel(_)
                | Endpoint::HotelsByOwner(_)
                | Endpoint::SetUpRoom
                | Endpoint::CreateRoom
                | Endpoint::UpdateRoomState { .. }
        )
    }

    /// Statuses that count as a pass for the positive scenario
    pub fn expected_statuses(&self) -> &'static [u16] {
        match self {
            Endpoint::SignUp(_)
            | Endpoint::CreateHotel
            | Endpoint::SetUpRoom
            | Endpoint::CreateRoom => &[200, 201],
            Endpoint::UpdateHotel(_) | Endpoint::UpdateRoomState { .. } => &[200, 204],
            Endpoint::GetHotel(_) | Endpoint::GetRoomById(_) => &[200, 404],
            Endpoint::SignIn
            | Endpoint::ListHotels
            | Endpoint::HotelsByOwner(_)
            | Endpoint::RoomsByState(_)
            | Endpoint::AllRooms
            | Endpoint::RoomsByType(_) => &[200],
        }
    }

    /// Whether a passing response must carry a JSON array
    pub fn expects_array(&self) -> bool {
        matches!(
            self,
            Endpoint::ListHotels | Endpoint::HotelsByOwner(_) | Endpoint::AllRooms
        )
    }

    pub fn name(&self) -> String {
        let path = self.path();
        match self.query() {
            Some((key, value)) => format!("{} {}?{}={}", self.method(), path, key, value),
            None => format!("{} {}", self.method(), path),
        }
    }
}

/// Statuses a rejected sign-in may come back with
pub const REJECTED_SIGN_IN: &[u16] = &[400, 401, 403];
