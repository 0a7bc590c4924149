//! Atomic queries against the ticket service.
//!
//! Every method is a single request/response pair. Empty result sets are
//! valid outcomes here; deciding what an empty set means is left to the
//! scenarios.

use crate::config::{RoutePair, WorkloadConfig};
use crate::error::{Error, Result};
use crate::session::Session;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// `foodType` sentinel meaning "no food ordered".
pub const NO_FOOD: &str = "0";

/// Response envelope every service wraps its payload in. The wire format
/// also carries a numeric `status`, but the outcome of every call is read
/// from `data` alone, so only the fields we consume are kept.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct Trip {
    #[serde(rename = "tripId")]
    trip_id: TripId,
}

#[derive(Debug, Deserialize)]
struct TripId {
    #[serde(rename = "type")]
    kind: String,
    number: String,
}

impl TripId {
    fn full_id(&self) -> String {
        format!("{}{}", self.kind, self.number)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodOption {
    pub food_type: i64,
    pub food_name: String,
    pub food_price: f64,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Contact {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    id: String,
    train_number: String,
    status: i64,
}

/// Order status codes on the wire.
pub mod status {
    pub const UNPAID: i64 = 0;
    pub const PAID: i64 = 1;
    pub const COLLECTED: i64 = 2;
    pub const CANCELLED: i64 = 4;
}

/// An `(orderId, tripId)` tuple, the unit of selection for pay, cancel and
/// collect actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPair {
    pub order_id: String,
    pub trip_id: String,
}

/// Reservation request body.
///
/// The food group is present only when food was ordered; `food_type` stays at
/// [`NO_FOOD`] otherwise. The consignment group is present as a whole or
/// absent as a whole.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreservePayload {
    pub account_id: String,
    pub contacts_id: String,
    pub trip_id: String,
    pub seat_type: String,
    pub date: String,
    #[serde(rename = "from")]
    pub from_station: String,
    #[serde(rename = "to")]
    pub to_station: String,
    pub assurance: u32,
    pub food_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consignee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consignee_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consignee_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderQuery {
    login_id: String,
    enable_state_query: bool,
    enable_travel_date_query: bool,
    enable_bought_date_query: bool,
    travel_date_start: Option<String>,
    travel_date_end: Option<String>,
    bought_date_start: Option<String>,
    bought_date_end: Option<String>,
}

impl OrderQuery {
    fn for_account(login_id: &str) -> Self {
        Self {
            login_id: login_id.to_string(),
            enable_state_query: false,
            enable_travel_date_query: false,
            enable_bought_date_query: false,
            travel_date_start: None,
            travel_date_end: None,
            bought_date_start: None,
            bought_date_end: None,
        }
    }
}

/// Thin HTTP client over the ticket service's endpoints.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl QueryClient {
    pub fn new(config: &WorkloadConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Precondition(format!("invalid endpoint {path:?}: {e}")))
    }

    async fn post<B, T>(&self, path: &str, headers: &HeaderMap, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get<T>(&self, path: &str, headers: &HeaderMap) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn login(&self) -> Result<AuthInfo> {
        let body = json!({ "username": self.username, "password": self.password });
        let envelope: Envelope<AuthInfo> = self
            .post("/api/v1/users/login", &HeaderMap::new(), &body)
            .await?;
        envelope.data.ok_or_else(|| Error::Business {
            endpoint: "login",
            detail: envelope.msg.unwrap_or_else(|| "no auth data".to_string()),
        })
    }

    pub async fn query_high_speed_ticket(
        &self,
        session: &Session,
        route: &RoutePair,
        date: &str,
    ) -> Result<Vec<String>> {
        self.query_tickets("/api/v1/travelservice/trips/left", session, route, date)
            .await
    }

    pub async fn query_normal_ticket(
        &self,
        session: &Session,
        route: &RoutePair,
        date: &str,
    ) -> Result<Vec<String>> {
        self.query_tickets("/api/v1/travel2service/trips/left", session, route, date)
            .await
    }

    async fn query_tickets(
        &self,
        path: &'static str,
        session: &Session,
        route: &RoutePair,
        date: &str,
    ) -> Result<Vec<String>> {
        let body = trip_query(route, date);
        let envelope: Envelope<Vec<Trip>> = self.post(path, &session.headers, &body).await?;
        let trips: Vec<String> = envelope
            .data
            .unwrap_or_default()
            .iter()
            .map(|trip| trip.trip_id.full_id())
            .collect();
        debug!(count = trips.len(), path, "trip candidates");
        Ok(trips)
    }

    pub async fn query_cheapest(
        &self,
        session: &Session,
        route: &RoutePair,
        date: &str,
    ) -> Result<()> {
        let body = trip_query(route, date);
        let envelope: Envelope<Vec<Value>> = self
            .post(
                "/api/v1/travelplanservice/travelPlan/cheapest",
                &session.headers,
                &body,
            )
            .await?;
        debug!(
            count = envelope.data.map(|plans| plans.len()).unwrap_or(0),
            "cheapest travel plans"
        );
        Ok(())
    }

    pub async fn query_assurances(&self, session: &Session) -> Result<Vec<Value>> {
        let envelope: Envelope<Vec<Value>> = self
            .get("/api/v1/assuranceservice/assurances/types", &session.headers)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn query_food(
        &self,
        session: &Session,
        route: &RoutePair,
        date: &str,
        trip_id: &str,
    ) -> Result<Vec<FoodOption>> {
        let path = format!(
            "/api/v1/foodservice/foods/{date}/{}/{}/{trip_id}",
            route.from, route.to
        );
        let envelope: Envelope<Vec<FoodOption>> = self.get(&path, &session.headers).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn query_contacts(&self, session: &Session) -> Result<Vec<String>> {
        let path = format!(
            "/api/v1/contactservice/contacts/account/{}",
            session.account_id
        );
        let envelope: Envelope<Vec<Contact>> = self.get(&path, &session.headers).await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|contact| contact.id)
            .collect())
    }

    /// Query the account's orders, filtered to the given status codes.
    ///
    /// `other` selects the secondary order store, which holds reservations
    /// made through the non-high-speed path.
    pub async fn query_orders(
        &self,
        session: &Session,
        statuses: &[i64],
        other: bool,
    ) -> Result<Vec<OrderPair>> {
        let path = if other {
            "/api/v1/orderOtherService/orderOther/refresh"
        } else {
            "/api/v1/orderservice/order/refresh"
        };
        let body = OrderQuery::for_account(&session.account_id);
        let envelope: Envelope<Vec<OrderRecord>> = self.post(path, &session.headers, &body).await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .filter(|order| statuses.contains(&order.status))
            .map(|order| OrderPair {
                order_id: order.id,
                trip_id: order.train_number,
            })
            .collect())
    }

    /// Submit a reservation and return the envelope's `data` marker.
    pub async fn preserve(
        &self,
        session: &Session,
        payload: &PreservePayload,
        high_speed: bool,
    ) -> Result<String> {
        let path = if high_speed {
            "/api/v1/preserveservice/preserve"
        } else {
            "/api/v1/preserveotherservice/preserveOther"
        };
        let envelope: Envelope<String> = self.post(path, &session.headers, payload).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Pay one order. `None` means the service did not confirm the payment.
    pub async fn pay_order(&self, session: &Session, pair: &OrderPair) -> Result<Option<String>> {
        let body = json!({ "orderId": pair.order_id, "tripId": pair.trip_id });
        let envelope: Envelope<Value> = self
            .post("/api/v1/inside_pay_service/inside_payment", &session.headers, &body)
            .await?;
        Ok(confirmed(envelope.data).then(|| pair.order_id.clone()))
    }

    pub async fn cancel_order(&self, session: &Session, order_id: &str) -> Result<Option<String>> {
        let path = format!(
            "/api/v1/cancelservice/cancel/{order_id}/{}",
            session.account_id
        );
        let envelope: Envelope<Value> = self.get(&path, &session.headers).await?;
        Ok(confirmed(envelope.data).then(|| order_id.to_string()))
    }

    pub async fn collect_ticket(&self, session: &Session, order_id: &str) -> Result<Option<String>> {
        let path = format!("/api/v1/executeservice/execute/collected/{order_id}");
        let envelope: Envelope<Value> = self.get(&path, &session.headers).await?;
        Ok(confirmed(envelope.data).then(|| order_id.to_string()))
    }
}

fn trip_query(route: &RoutePair, date: &str) -> Value {
    json!({
        "startingPlace": route.from,
        "endPlace": route.to,
        "departureTime": date,
    })
}

fn confirmed(data: Option<Value>) -> bool {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}
