mod utils;
#[allow(unused)]
use utils::*;

use mock_service::MOCK_ACCOUNT_ID;
use railstorm::client::{status, OrderPair, QueryClient};
use railstorm::decide::ScriptedDecisions;
use railstorm::scenario::ScenarioRunner;
use railstorm::session::Session;

#[tokio::test]
async fn reserve_creates_an_unpaid_order() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();
    assert_eq!(session.account_id, MOCK_ACCOUNT_ID);

    // high_speed=true, no food, no assurance, no consignment
    let mut decisions = ScriptedDecisions::new().with_bools([true]);
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);
    runner.reserve_ticket(&session).await.unwrap();

    let orders = state.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, status::UNPAID);
    assert!(!orders[0].other);
    assert_eq!(orders[0].train_number, "D1345");
}

#[tokio::test]
async fn normal_reservation_lands_in_the_secondary_store() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let mut decisions = ScriptedDecisions::new().with_bools([false]);
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);
    runner.reserve_ticket(&session).await.unwrap();

    let orders = state.orders();
    assert_eq!(orders.len(), 1);
    assert!(orders[0].other);
    assert_eq!(orders[0].train_number, "K1022");
}

#[tokio::test]
async fn reserve_with_no_trip_candidates_is_a_silent_no_op() {
    init();
    let (state, config) = mock_target().await;
    state.set_trips_available(false);
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let mut decisions = ScriptedDecisions::new().with_bools([true]);
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);
    runner.reserve_ticket(&session).await.unwrap();

    assert!(state.orders().is_empty());
}

#[tokio::test]
async fn rejected_reservation_raises_a_business_error() {
    init();
    let (state, config) = mock_target().await;
    state.set_reject_preserve(true);
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let mut decisions = ScriptedDecisions::new().with_bools([true]);
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);
    let err = runner.reserve_ticket(&session).await.unwrap_err();

    assert_eq!(err.kind(), "business");
    assert!(err.to_string().contains("Seats Not Enough"));
    assert!(state.orders().is_empty());
}

#[tokio::test]
async fn empty_pair_sets_are_no_ops() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let mut decisions = ScriptedDecisions::new();
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);

    runner.collect_ticket(&session).await.unwrap();
    runner.pay_order(&session, &[]).await.unwrap();
    runner.cancel_order(&session, None).await.unwrap();

    assert!(state.orders().is_empty());
}

#[tokio::test]
async fn unconfirmed_mutations_are_swallowed() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    // A collected order can be neither paid nor cancelled; the service
    // answers without a confirmation and the scenario carries on.
    let order_id = state.seed_order("D1345", status::COLLECTED, false);
    let pair = OrderPair {
        order_id: order_id.clone(),
        trip_id: "D1345".into(),
    };

    let mut decisions = ScriptedDecisions::new();
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);

    runner.pay_order(&session, &[pair.clone()]).await.unwrap();
    runner.cancel_order(&session, Some(vec![pair])).await.unwrap();

    // Same shape at the wire level: collecting an order that was never paid
    // yields no confirmation instead of an error.
    let unpaid = state.seed_order("G1234", status::UNPAID, false);
    let receipt = client.collect_ticket(&session, &unpaid).await.unwrap();
    assert!(receipt.is_none());

    let orders = state.orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].status, status::COLLECTED);
    assert_eq!(orders[1].status, status::UNPAID);
}

#[tokio::test]
async fn pay_collect_and_cancel_walk_the_order_lifecycle() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let order_id = state.seed_order("D1345", status::UNPAID, false);

    let mut decisions = ScriptedDecisions::new();
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);

    let unpaid = client
        .query_orders(&session, &[status::UNPAID], false)
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].order_id, order_id);

    runner.pay_order(&session, &unpaid).await.unwrap();
    assert_eq!(state.orders()[0].status, status::PAID);

    runner.collect_ticket(&session).await.unwrap();
    assert_eq!(state.orders()[0].status, status::COLLECTED);

    // A collected order is no longer a cancel candidate; the fresh unpaid one
    // is the only pick left.
    let second = state.seed_order("G1234", status::UNPAID, false);
    runner.cancel_order(&session, None).await.unwrap();
    let orders = state.orders();
    let cancelled = orders.iter().find(|o| o.id == second).unwrap();
    assert_eq!(cancelled.status, status::CANCELLED);
}

#[tokio::test]
async fn collect_sees_orders_in_both_stores() {
    init();
    let (state, config) = mock_target().await;
    let client = QueryClient::new(&config);
    let session = Session::establish(&client).await.unwrap();

    let order_id = state.seed_order("Z51", status::PAID, true);

    let mut decisions = ScriptedDecisions::new();
    let mut runner = ScenarioRunner::new(&client, &config, &mut decisions);
    runner.collect_ticket(&session).await.unwrap();

    let orders = state.orders();
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].status, status::COLLECTED);
}
