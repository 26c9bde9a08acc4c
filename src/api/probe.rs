//! One pass over every endpoint with the fixture payloads
//!
//! Used by the `probe` command to smoke-test a deployment. Each check sends
//! one request and compares the status (and array shape where relevant)
//! against what the positive scenario expects.

use super::payloads::{
    CreateHotelRequest, CreateRoomRequest, RoomStateRequest, SetUpRoomRequest, SignInRequest,
    SignUpRequest, UpdateHotelRequest,
};
use super::{AccountKind, ApiClient, ApiResponse, Endpoint, REJECTED_SIGN_IN};
use serde::Serialize;
use serde_json::Value;

pub const FIXTURE_HOTEL_ID: &str = "test_hotel_id_123";
pub const FIXTURE_OWNER_ID: &str = "test_owner_id_123";
pub const FIXTURE_ROOM_ID: &str = "test_room_id_123";

/// Token used when neither the config nor sign-in provides one
pub const FALLBACK_TOKEN: &str = "test_token_here";

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub status: Option<u16>,
    pub expected: Vec<u16>,
    pub passed: bool,
    pub detail: String,
}

struct Check {
    name: String,
    endpoint: Endpoint,
    body: Option<Value>,
    expected: Vec<u16>,
    needs_array: bool,
    needs_token: bool,
}

impl Check {
    fn new(endpoint: Endpoint) -> Self {
        Self {
            name: endpoint.name(),
            expected: endpoint.expected_statuses().to_vec(),
            needs_array: endpoint.expects_array(),
            needs_token: false,
            body: None,
            endpoint,
        }
    }

    fn body<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_value(body).ok();
        self
    }

    fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn expecting(mut self, statuses: &[u16]) -> Self {
        self.expected = statuses.to_vec();
        self
    }

    fn with_token_field(mut self) -> Self {
        self.needs_token = true;
        self
    }

    fn evaluate(&self, response: &ApiResponse) -> (bool, String) {
        if !response.status_in(&self.expected) {
            return (false, format!("unexpected status {}", response.status));
        }
        if self.needs_array && response.is_success() && !response.is_array() {
            return (false, "expected a JSON array".to_string());
        }
        if self.needs_token && response.token().is_none() {
            return (false, "response has no token".to_string());
        }
        (true, "ok".to_string())
    }
}

fn checks() -> (Vec<Check>, Vec<Check>) {
    let mut public: Vec<Check> = AccountKind::ALL
        .iter()
        .map(|kind| Check::new(Endpoint::SignUp(*kind)).body(&SignUpRequest::sample(*kind)))
        .collect();
    public.push(
        Check::new(Endpoint::SignIn)
            .body(&SignInRequest::sample())
            .with_token_field(),
    );
    public.push(
        Check::new(Endpoint::SignIn)
            .body(&SignInRequest::invalid())
            .named("POST authentication/sign-in (invalid)")
            .expecting(REJECTED_SIGN_IN),
    );

    let authed = vec![
        Check::new(Endpoint::CreateHotel).body(&CreateHotelRequest::sample()),
        Check::new(Endpoint::ListHotels),
        Check::new(Endpoint::GetHotel(FIXTURE_HOTEL_ID.to_string())),
        Check::new(Endpoint::UpdateHotel(FIXTURE_HOTEL_ID.to_string()))
            .body(&UpdateHotelRequest::sample()),
        Check::new(Endpoint::HotelsByOwner(FIXTURE_OWNER_ID.to_string())),
        Check::new(Endpoint::SetUpRoom).body(&SetUpRoomRequest::sample()),
        Check::new(Endpoint::CreateRoom).body(&CreateRoomRequest::sample()),
        Check::new(Endpoint::UpdateRoomState {
            room_id: FIXTURE_ROOM_ID.to_string(),
        })
        .body(&RoomStateRequest::new("maintenance")),
        Check::new(Endpoint::GetRoomById(FIXTURE_ROOM_ID.to_string())),
        Check::new(Endpoint::RoomsByState("available".to_string())),
        Check::new(Endpoint::AllRooms),
        Check::new(Endpoint::RoomsByType("suite".to_string())),
    ];
    (public, authed)
}

async fn run_check(client: &ApiClient, check: &Check) -> (CheckOutcome, Option<ApiResponse>) {
    let (status, passed, detail, response) =
        match client.send(&check.endpoint, check.body.as_ref()).await {
            Ok(response) => {
                let (passed, detail) = check.evaluate(&response);
                (Some(response.status), passed, detail, Some(response))
            }
            Err(e) => (None, false, e.to_string(), None),
        };
    tracing::debug!("{}: {}", check.name, detail);
    let outcome = CheckOutcome {
        name: check.name.clone(),
        status,
        expected: check.expected.clone(),
        passed,
        detail,
    };
    (outcome, response)
}

/// Run every check; authenticated ones use `token`, else the sign-in token
pub async fn run_all(client: &ApiClient, token: Option<&str>) -> Vec<CheckOutcome> {
    let (public, authed) = checks();
    let mut anonymous = client.clone();
    anonymous.set_token(None);

    let mut outcomes = Vec::new();
    let mut issued_token = None;
    for check in &public {
        let (outcome, response) = run_check(&anonymous, check).await;
        if check.needs_token && issued_token.is_none() {
            issued_token = response.and_then(|r| r.token().map(str::to_string));
        }
        outcomes.push(outcome);
    }

    let token = token
        .map(str::to_string)
        .or(issued_token)
        .unwrap_or_else(|| FALLBACK_TOKEN.to_string());
    let authenticated = anonymous.with_token(token);
    for check in &authed {
        outcomes.push(run_check(&authenticated, check).await.0);
    }
    outcomes
}
