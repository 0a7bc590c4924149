//! User-journey scenarios composed from atomic queries.
//!
//! Every scenario follows the same shape: query candidate data, no-op on an
//! empty result, make random decisions, build the request, submit, validate.
//! A failed reservation raises; a failed collect/pay/cancel is a silent no-op.
//! That asymmetry mirrors the severity the original workload assigns to each
//! mutation.

use crate::client::{status, FoodOption, OrderPair, PreservePayload, QueryClient, NO_FOOD};
use crate::config::{RoutePair, WorkloadConfig, FOOD_SAMPLE_TRIP};
use crate::decide::DecisionMaker;
use crate::error::{Error, Result};
use crate::session::Session;
use tracing::{debug, info};

/// Seat classes offered on both trip kinds.
pub const SEAT_TYPES: [&str; 2] = ["2", "3"];

const SUCCESS_MARKER: &str = "Success";

/// Runs one scenario at a time against a borrowed client.
pub struct ScenarioRunner<'a, D> {
    client: &'a QueryClient,
    config: &'a WorkloadConfig,
    decisions: &'a mut D,
}

impl<'a, D: DecisionMaker> ScenarioRunner<'a, D> {
    pub fn new(client: &'a QueryClient, config: &'a WorkloadConfig, decisions: &'a mut D) -> Self {
        Self {
            client,
            config,
            decisions,
        }
    }

    /// Search a random trip class, look up ancillary options and submit a
    /// randomized reservation.
    ///
    /// No trip candidates is a valid no-op. A response without the success
    /// marker is a business failure and raises.
    pub async fn reserve_ticket(&mut self, session: &Session) -> Result<()> {
        let high_speed = self.decisions.decide();
        let route = if high_speed {
            self.config.high_speed_route.clone()
        } else {
            self.config.normal_route.clone()
        };
        let date = &self.config.travel_date;

        let trips = if high_speed {
            self.client
                .query_high_speed_ticket(session, &route, date)
                .await?
        } else {
            self.client.query_normal_ticket(session, &route, date).await?
        };

        // Three independent ancillary lookups, as a real booking flow issues.
        self.client.query_assurances(session).await?;
        let foods = self
            .client
            .query_food(session, &route, date, FOOD_SAMPLE_TRIP)
            .await?;
        let contacts = self.client.query_contacts(session).await?;

        let Some(payload) = build_preserve_payload(
            self.decisions,
            &session.account_id,
            &route,
            date,
            &trips,
            &foods,
            &contacts,
        )?
        else {
            debug!(high_speed, "no trip candidates, skipping reservation");
            return Ok(());
        };

        info!(
            high_speed,
            need_food = payload.food_type != NO_FOOD,
            need_assurance = payload.assurance == 1,
            need_consign = payload.consignee_name.is_some(),
            trip_id = %payload.trip_id,
            "reserving ticket"
        );

        let marker = self.client.preserve(session, &payload, high_speed).await?;
        if marker != SUCCESS_MARKER {
            return Err(Error::Business {
                endpoint: if high_speed { "preserve" } else { "preserveOther" },
                detail: marker,
            });
        }
        Ok(())
    }

    /// Collect one paid, not-yet-collected order, querying both order stores.
    ///
    /// An unconfirmed collect result is a silent no-op, unlike a failed
    /// reservation.
    pub async fn collect_ticket(&mut self, session: &Session) -> Result<()> {
        let mut pairs = self.client.query_orders(session, &[status::PAID], false).await?;
        pairs.extend(self.client.query_orders(session, &[status::PAID], true).await?);

        let Some(pair) = self.decisions.pick(&pairs) else {
            debug!("no paid orders to collect");
            return Ok(());
        };

        match self.client.collect_ticket(session, &pair.order_id).await? {
            Some(order_id) => info!(%order_id, "order collected"),
            None => debug!(order_id = %pair.order_id, "collect not confirmed"),
        }
        Ok(())
    }

    /// Pay one order from the caller-supplied pair set.
    pub async fn pay_order(&mut self, session: &Session, pairs: &[OrderPair]) -> Result<()> {
        let Some(pair) = self.decisions.pick(pairs) else {
            debug!("no unpaid orders to pay");
            return Ok(());
        };

        match self.client.pay_order(session, pair).await? {
            Some(order_id) => info!(%order_id, "order paid"),
            None => debug!(order_id = %pair.order_id, "payment not confirmed"),
        }
        Ok(())
    }

    /// Cancel one unpaid-or-paid order. Self-queries both order stores when
    /// the caller does not supply pairs.
    pub async fn cancel_order(
        &mut self,
        session: &Session,
        pairs: Option<Vec<OrderPair>>,
    ) -> Result<()> {
        let pairs = match pairs {
            Some(pairs) => pairs,
            None => {
                let mut pairs = self
                    .client
                    .query_orders(session, &[status::UNPAID, status::PAID], false)
                    .await?;
                pairs.extend(
                    self.client
                        .query_orders(session, &[status::UNPAID, status::PAID], true)
                        .await?,
                );
                pairs
            }
        };

        let Some(pair) = self.decisions.pick(&pairs) else {
            debug!("no orders to cancel");
            return Ok(());
        };

        match self.client.cancel_order(session, &pair.order_id).await? {
            Some(order_id) => info!(%order_id, "order cancelled"),
            None => debug!(order_id = %pair.order_id, "cancel not confirmed"),
        }
        Ok(())
    }
}

/// Build a reservation body from the candidate sets and a decision sequence.
///
/// Returns `Ok(None)` when there is no trip to book. Missing contacts, or
/// missing food options when food was decided on, are precondition failures:
/// the account is not set up the way the workload requires.
pub(crate) fn build_preserve_payload<D: DecisionMaker>(
    decisions: &mut D,
    account_id: &str,
    route: &RoutePair,
    date: &str,
    trips: &[String],
    foods: &[FoodOption],
    contacts: &[String],
) -> Result<Option<PreservePayload>> {
    let Some(trip_id) = decisions.pick(trips) else {
        return Ok(None);
    };

    let mut payload = PreservePayload {
        account_id: account_id.to_string(),
        contacts_id: String::new(),
        trip_id: trip_id.clone(),
        seat_type: String::new(),
        date: date.to_string(),
        from_station: route.from.clone(),
        to_station: route.to.clone(),
        assurance: 0,
        food_type: NO_FOOD.to_string(),
        food_name: None,
        food_price: None,
        station_name: None,
        store_name: None,
        consignee_name: None,
        consignee_phone: None,
        consignee_weight: None,
        handle_date: None,
    };

    if decisions.decide() {
        let food = decisions
            .pick(foods)
            .ok_or_else(|| Error::Precondition("no food options for the queried trip".into()))?;
        payload.food_type = food.food_type.to_string();
        payload.food_name = Some(food.food_name.clone());
        payload.food_price = Some(food.food_price);
        payload.station_name = food.station_name.clone();
        payload.store_name = food.store_name.clone();
    }

    if decisions.decide() {
        payload.assurance = 1;
    }

    let contact = decisions
        .pick(contacts)
        .ok_or_else(|| Error::Precondition("account has no contacts".into()))?;
    payload.contacts_id = contact.clone();

    let seat = decisions.pick(&SEAT_TYPES).unwrap_or(&SEAT_TYPES[0]);
    payload.seat_type = (*seat).to_string();

    if decisions.decide() {
        payload.consignee_name = Some(decisions.consignee_name());
        payload.consignee_phone = Some(decisions.phone_number());
        payload.consignee_weight = Some(decisions.consign_weight());
        payload.handle_date = Some(date.to_string());
    }

    Ok(Some(payload))
}
