//! In-process stand-in for the SweetManager backend and the chatbot server
//!
//! Serves every endpoint the suite consumes under `/api/v1`, plus `/chat`
//! and `/models`, from in-memory seed data.

use crate::api::payloads::SAMPLE_PASSWORD;
use crate::chatbot::{echo_reply, ChatReply, ChatRequest, ModelsResponse, KNOWN_MODELS};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub const SEED_USERNAME: &str = "testuser";
pub const SEED_HOTEL_ID: &str = "test_hotel_id_123";
pub const SEED_OWNER_ID: &str = "test_owner_id_123";
pub const SEED_ROOM_ID: &str = "test_room_id_123";

#[derive(Debug, Clone)]
struct StoredUser {
    username: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Hotel {
    id: String,
    owner_id: String,
    name: String,
    address: String,
    city: String,
    country: String,
    stars: u8,
    amenities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Room {
    id: String,
    hotel_id: String,
    room_number: String,
    floor: Option<u32>,
    type_room: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct SignUpBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignInBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelBody {
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    stars: Option<u8>,
    amenities: Option<Vec<String>>,
    owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomBody {
    hotel_id: Option<String>,
    room_number: Option<String>,
    floor: Option<u32>,
    type_room_id: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoomStateBody {
    state: String,
}

/// In-memory backend data
#[derive(Debug, Default)]
struct StubData {
    users: HashMap<String, StoredUser>,
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    next_id: u64,
}

impl StubData {
    fn seeded() -> Self {
        let mut data = StubData {
            next_id: 1,
            ..Default::default()
        };
        data.users.insert(
            SEED_USERNAME.to_string(),
            StoredUser {
                username: SEED_USERNAME.to_string(),
                email: "testuser@sweetmanager.com".to_string(),
                password: SAMPLE_PASSWORD.to_string(),
                role: "owner".to_string(),
            },
        );
        data.hotels.push(Hotel {
            id: SEED_HOTEL_ID.to_string(),
            owner_id: SEED_OWNER_ID.to_string(),
            name: "Sweet Seaside Hotel".to_string(),
            address: "Av. Larco 101".to_string(),
            city: "Lima".to_string(),
            country: "Peru".to_string(),
            stars: 4,
            amenities: vec!["WiFi".to_string(), "Breakfast".to_string()],
        });
        data.rooms.push(Room {
            id: SEED_ROOM_ID.to_string(),
            hotel_id: SEED_HOTEL_ID.to_string(),
            room_number: "100".to_string(),
            floor: Some(1),
            type_room: "suite".to_string(),
            state: "available".to_string(),
        });
        data
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{}_{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }
}

type SharedState = Arc<RwLock<StubData>>;

/// Build the stub router with fresh seed data
pub fn router() -> Router {
    let state: SharedState = Arc::new(RwLock::new(StubData::seeded()));

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(handle_chat))
        .route("/models", get(list_models))
        .route("/api/v1/authentication/sign-up-admin", sign_up_route("admin"))
        .route("/api/v1/authentication/sign-up-guest", sign_up_route("guest"))
        .route("/api/v1/authentication/sign-up-owner", sign_up_route("owner"))
        .route("/api/v1/authentication/sign-in", post(sign_in))
        .route("/api/v1/hotels", get(list_hotels).post(create_hotel))
        .route("/api/v1/hotels/owner/:owner_id", get(hotels_by_owner))
        .route("/api/v1/hotels/:id", get(get_hotel).put(update_hotel))
        .route("/api/v1/room/set-up", post(set_up_room))
        .route("/api/v1/room/create-room", post(create_room))
        .route("/api/v1/room/update-room-state", put(update_room_state))
        .route("/api/v1/room/get-room-by-id", get(get_room_by_id))
        .route("/api/v1/room/get-room-by-state", get(get_rooms_by_state))
        .route("/api/v1/room/get-all-rooms", get(get_all_rooms))
        .route("/api/v1/room/get-room-by-type-room", get(get_rooms_by_type))
        .with_state(state)
}

/// Stub server bound to a random local port, stopped on drop
#[derive(Debug)]
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Stub server failed: {}", e);
            }
        });
        tracing::debug!("Stub backend listening on {}", addr);

        Ok(Self { addr, handle })
    }

    /// Root URL, e.g. `http://127.0.0.1:12345`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL of the platform API
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.url())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run the stub backend until interrupted
pub async fn run_stub_server(host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Stub backend listening on http://{}", listener.local_addr()?);
    tracing::info!("API base URL: http://{}/api/v1", listener.local_addr()?);

    axum::serve(listener, router()).await?;
    Ok(())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Mutating endpoints need `Authorization: Bearer <token>`
fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty())
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Missing bearer token")
}

fn query_param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_chat(Json(request): Json<ChatRequest>) -> Json<ChatReply> {
    Json(ChatReply {
        message: Some(echo_reply(&request.message)),
        conversation_id: request.conversation_id,
    })
}

async fn list_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: KNOWN_MODELS.iter().map(|m| m.to_string()).collect(),
    })
}

fn sign_up_route(role: &'static str) -> MethodRouter<SharedState> {
    post(
        move |State(state): State<SharedState>, Json(body): Json<SignUpBody>| async move {
            sign_up(role, state, body).await
        },
    )
}

async fn sign_up(role: &'static str, state: SharedState, body: SignUpBody) -> Response {
    if [&body.username, &body.email, &body.password]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return error(
            StatusCode::BAD_REQUEST,
            "username, email and password are required",
        );
    }

    let mut data = state.write().await;
    if data.users.contains_key(&body.username) {
        return error(StatusCode::CONFLICT, "Username already exists");
    }

    let user = StoredUser {
        username: body.username.clone(),
        email: body.email,
        password: body.password,
        role: body.role.unwrap_or_else(|| role.to_string()),
    };
    let id = data.next_id("user");
    let response = json!({
        "id": id,
        "username": user.username,
        "email": user.email,
        "role": user.role,
    });
    data.users.insert(body.username, user);

    (StatusCode::CREATED, Json(response)).into_response()
}

async fn sign_in(State(state): State<SharedState>, Json(body): Json<SignInBody>) -> Response {
    let data = state.read().await;
    match data.users.get(&body.username) {
        Some(user) if user.password == body.password => Json(json!({
            "token": format!("stub-token-{}", user.username),
            "username": user.username,
        }))
        .into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn list_hotels(State(state): State<SharedState>) -> Json<Vec<Hotel>> {
    Json(state.read().await.hotels.clone())
}

async fn create_hotel(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<HotelBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Hotel name is required");
    };

    let mut data = state.write().await;
    let hotel = Hotel {
        id: data.next_id("hotel"),
        owner_id: body.owner_id.unwrap_or_else(|| SEED_OWNER_ID.to_string()),
        name,
        address: body.address.unwrap_or_default(),
        city: body.city.unwrap_or_default(),
        country: body.country.unwrap_or_default(),
        stars: body.stars.unwrap_or(0),
        amenities: body.amenities.unwrap_or_default(),
    };
    data.hotels.push(hotel.clone());
    (StatusCode::CREATED, Json(hotel)).into_response()
}

async fn get_hotel(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let data = state.read().await;
    match data.hotels.iter().find(|h| h.id == id) {
        Some(hotel) => Json(hotel.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Hotel not found"),
    }
}

async fn update_hotel(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<HotelBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = state.write().await;
    let Some(hotel) = data.hotels.iter_mut().find(|h| h.id == id) else {
        return error(StatusCode::NOT_FOUND, "Hotel not found");
    };

    if let Some(name) = body.name {
        hotel.name = name;
    }
    if let Some(address) = body.address {
        hotel.address = address;
    }
    if let Some(city) = body.city {
        hotel.city = city;
    }
    if let Some(country) = body.country {
        hotel.country = country;
    }
    if let Some(stars) = body.stars {
        hotel.stars = stars;
    }
    if let Some(amenities) = body.amenities {
        hotel.amenities = amenities;
    }
    Json(hotel.clone()).into_response()
}

async fn hotels_by_owner(
    State(state): State<SharedState>,
    Path(owner_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = state.read().await;
    let hotels: Vec<Hotel> = data
        .hotels
        .iter()
        .filter(|h| h.owner_id == owner_id)
        .cloned()
        .collect();
    Json(hotels).into_response()
}

/// `suite_type_id` -> `suite`
fn room_type_from_id(type_room_id: &str) -> String {
    type_room_id
        .strip_suffix("_type_id")
        .unwrap_or(type_room_id)
        .to_string()
}

async fn insert_room(state: &SharedState, body: RoomBody, default_state: &str) -> Response {
    let (Some(hotel_id), Some(room_number)) = (body.hotel_id, body.room_number) else {
        return error(StatusCode::BAD_REQUEST, "hotelId and roomNumber are required");
    };

    let mut data = state.write().await;
    let room = Room {
        id: data.next_id("room"),
        hotel_id,
        room_number,
        floor: body.floor,
        type_room: body
            .type_room_id
            .as_deref()
            .map(room_type_from_id)
            .unwrap_or_default(),
        state: body.status.unwrap_or_else(|| default_state.to_string()),
    };
    data.rooms.push(room.clone());
    (StatusCode::CREATED, Json(room)).into_response()
}

async fn set_up_room(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<RoomBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    insert_room(&state, body, "available").await
}

async fn create_room(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<RoomBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    insert_room(&state, body, "available").await
}

async fn update_room_state(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<RoomStateBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let Some(room_id) = query_param(&params, "roomId") else {
        return error(StatusCode::BAD_REQUEST, "roomId is required");
    };

    let mut data = state.write().await;
    match data.rooms.iter_mut().find(|r| r.id == room_id) {
        Some(room) => {
            room.state = body.state;
            Json(room.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Room not found"),
    }
}

async fn get_room_by_id(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(id) = query_param(&params, "id") else {
        return error(StatusCode::BAD_REQUEST, "id is required");
    };
    let data = state.read().await;
    match data.rooms.iter().find(|r| r.id == id) {
        Some(room) => Json(room.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Room not found"),
    }
}

async fn get_rooms_by_state(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(wanted) = query_param(&params, "state") else {
        return error(StatusCode::BAD_REQUEST, "state is required");
    };
    let data = state.read().await;
    let rooms: Vec<Room> = data
        .rooms
        .iter()
        .filter(|r| r.state.eq_ignore_ascii_case(wanted))
        .cloned()
        .collect();
    Json(rooms).into_response()
}

async fn get_all_rooms(State(state): State<SharedState>) -> Json<Vec<Room>> {
    Json(state.read().await.rooms.clone())
}

async fn get_rooms_by_type(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(wanted) = query_param(&params, "typeRoom") else {
        return error(StatusCode::BAD_REQUEST, "typeRoom is required");
    };
    let data = state.read().await;
    let rooms: Vec<Room> = data
        .rooms
        .iter()
        .filter(|r| r.type_room.eq_ignore_ascii_case(wanted))
        .cloned()
        .collect();
    Json(rooms).into_response()
}
