//! In-memory mock of the train-ticket service, covering every endpoint the
//! workload generator touches. Tests spawn one instance per test with its own
//! state and inspect the order store directly.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

pub const MOCK_ACCOUNT_ID: &str = "4d2a46c7-71cb-4cf1-b5bb-b68406d9da6f";

const UNPAID: i64 = 0;
const PAID: i64 = 1;
const COLLECTED: i64 = 2;
const CANCELLED: i64 = 4;

#[derive(Debug, Clone)]
pub struct MockOrder {
    pub id: String,
    pub train_number: String,
    pub status: i64,
    /// Lives in the secondary ("other") order store.
    pub other: bool,
}

#[derive(Debug)]
pub struct MockState {
    orders: RwLock<Vec<MockOrder>>,
    next_order: AtomicU64,
    reject_preserve: AtomicBool,
    trips_available: AtomicBool,
}

impl MockState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            orders: RwLock::new(Vec::new()),
            next_order: AtomicU64::new(1),
            reject_preserve: AtomicBool::new(false),
            trips_available: AtomicBool::new(true),
        })
    }

    /// Make the preserve endpoints answer with a non-success marker.
    pub fn set_reject_preserve(&self, reject: bool) {
        self.reject_preserve.store(reject, Ordering::Relaxed);
    }

    /// Make trip searches come back empty.
    pub fn set_trips_available(&self, available: bool) {
        self.trips_available.store(available, Ordering::Relaxed);
    }

    pub fn orders(&self) -> Vec<MockOrder> {
        self.orders.read().unwrap().clone()
    }

    /// Insert an order directly, bypassing the preserve flow.
    pub fn seed_order(&self, train_number: &str, status: i64, other: bool) -> String {
        let id = self.allocate_order_id();
        self.orders.write().unwrap().push(MockOrder {
            id: id.clone(),
            train_number: train_number.to_string(),
            status,
            other,
        });
        id
    }

    fn allocate_order_id(&self) -> String {
        format!("order-{}", self.next_order.fetch_add(1, Ordering::Relaxed))
    }

    fn transition(&self, order_id: &str, from: &[i64], to: i64) -> Option<String> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .iter_mut()
            .find(|order| order.id == order_id && from.contains(&order.status))?;
        order.status = to;
        Some(order.id.clone())
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/travelservice/trips/left", post(high_speed_trips))
        .route("/api/v1/travel2service/trips/left", post(normal_trips))
        .route("/api/v1/travelplanservice/travelPlan/cheapest", post(cheapest))
        .route("/api/v1/assuranceservice/assurances/types", get(assurance_types))
        .route("/api/v1/foodservice/foods/:date/:from/:to/:trip", get(foods))
        .route("/api/v1/contactservice/contacts/account/:account_id", get(contacts))
        .route("/api/v1/orderservice/order/refresh", post(primary_orders))
        .route("/api/v1/orderOtherService/orderOther/refresh", post(other_orders))
        .route("/api/v1/preserveservice/preserve", post(preserve))
        .route("/api/v1/preserveotherservice/preserveOther", post(preserve_other))
        .route("/api/v1/inside_pay_service/inside_payment", post(pay))
        .route("/api/v1/cancelservice/cancel/:order_id/:account_id", get(cancel))
        .route("/api/v1/executeservice/execute/collected/:order_id", get(collect))
        .with_state(state)
}

pub async fn run(addr: SocketAddr, state: Arc<MockState>) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router(state)).await.unwrap();
}

/// Bind on an ephemeral local port and serve in the background.
pub async fn spawn(state: Arc<MockState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "status": 1, "msg": "ok", "data": data }))
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    debug!(username = ?body.get("username"), "mock login");
    envelope(json!({ "userId": MOCK_ACCOUNT_ID, "token": "mock-token" }))
}

fn trip(kind: &str, number: &str) -> Value {
    json!({ "tripId": { "type": kind, "number": number } })
}

async fn high_speed_trips(State(state): State<Arc<MockState>>) -> Json<Value> {
    if !state.trips_available.load(Ordering::Relaxed) {
        return envelope(json!([]));
    }
    envelope(json!([trip("D", "1345"), trip("G", "1234")]))
}

async fn normal_trips(State(state): State<Arc<MockState>>) -> Json<Value> {
    if !state.trips_available.load(Ordering::Relaxed) {
        return envelope(json!([]));
    }
    envelope(json!([trip("K", "1022"), trip("Z", "51")]))
}

async fn cheapest() -> Json<Value> {
    envelope(json!([{ "tripId": "D1345", "priceForSecondClassSeat": "22.5" }]))
}

async fn assurance_types() -> Json<Value> {
    envelope(json!([{ "index": 1, "name": "Traffic Accident Assurance", "price": 3.0 }]))
}

async fn foods() -> Json<Value> {
    envelope(json!([
        {
            "foodType": 1,
            "foodName": "Bone Soup",
            "foodPrice": 2.5,
            "stationName": "Su Zhou",
            "storeName": "Roman Holiday"
        },
        { "foodType": 2, "foodName": "Rice", "foodPrice": 8.0 }
    ]))
}

async fn contacts(Path(account_id): Path<String>) -> Json<Value> {
    envelope(json!([
        { "id": format!("{account_id}-contact-1"), "name": "Contact One" },
        { "id": format!("{account_id}-contact-2"), "name": "Contact Two" }
    ]))
}

fn order_listing(state: &MockState, other: bool) -> Json<Value> {
    let orders: Vec<Value> = state
        .orders()
        .into_iter()
        .filter(|order| order.other == other)
        .map(|order| {
            json!({
                "id": order.id,
                "trainNumber": order.train_number,
                "status": order.status,
            })
        })
        .collect();
    envelope(json!(orders))
}

async fn primary_orders(State(state): State<Arc<MockState>>) -> Json<Value> {
    order_listing(&state, false)
}

async fn other_orders(State(state): State<Arc<MockState>>) -> Json<Value> {
    order_listing(&state, true)
}

fn do_preserve(state: &MockState, payload: &Value, other: bool) -> Json<Value> {
    if state.reject_preserve.load(Ordering::Relaxed) {
        return envelope(json!("Seats Not Enough"));
    }
    let train_number = payload
        .get("tripId")
        .and_then(|v| v.as_str())
        .unwrap_or("D1345");
    let id = state.seed_order(train_number, UNPAID, other);
    debug!(%id, train_number, other, "mock reservation created");
    envelope(json!("Success"))
}

async fn preserve(State(state): State<Arc<MockState>>, Json(payload): Json<Value>) -> Json<Value> {
    do_preserve(&state, &payload, false)
}

async fn preserve_other(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    do_preserve(&state, &payload, true)
}

async fn pay(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    let order_id = body.get("orderId").and_then(|v| v.as_str()).unwrap_or("");
    match state.transition(order_id, &[UNPAID], PAID) {
        Some(id) => envelope(json!(id)),
        None => envelope(Value::Null),
    }
}

async fn cancel(
    State(state): State<Arc<MockState>>,
    Path((order_id, _account_id)): Path<(String, String)>,
) -> Json<Value> {
    match state.transition(&order_id, &[UNPAID, PAID], CANCELLED) {
        Some(id) => envelope(json!(id)),
        None => envelope(Value::Null),
    }
}

async fn collect(
    State(state): State<Arc<MockState>>,
    Path(order_id): Path<String>,
) -> Json<Value> {
    match state.transition(&order_id, &[PAID], COLLECTED) {
        Some(id) => envelope(json!(id)),
        None => envelope(Value::Null),
    }
}
