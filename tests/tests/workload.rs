mod utils;
#[allow(unused)]
use utils::*;

use railstorm::decide::EntropyDecisions;
use railstorm::WorkloadLoop;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn full_loop_exercises_the_target() {
    init();
    let (state, config) = mock_target().await;

    let mut workload =
        WorkloadLoop::with_parts(config, EntropyDecisions::seeded(7), fixed_probe(5.0, 10.0));
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    let handle = tokio::spawn(async move { workload.run(shutdown).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    trigger.cancel();
    handle.await.unwrap();

    // Roughly half the iterations reserve; some of those get paid or
    // cancelled by later passes.
    assert!(!state.orders().is_empty());
}

#[tokio::test]
async fn throttled_loop_leaves_the_target_untouched() {
    init();
    let (state, config) = mock_target().await;

    let mut workload = WorkloadLoop::with_parts(
        config,
        EntropyDecisions::seeded(7),
        fixed_probe(95.0, 10.0),
    );
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    let handle = tokio::spawn(async move { workload.run(shutdown).await });

    // Cancel while the loop sits in its first throttle pause.
    tokio::time::sleep(Duration::from_millis(500)).await;
    trigger.cancel();
    handle.await.unwrap();

    assert!(state.orders().is_empty());
}

#[tokio::test]
async fn failed_reservation_abandons_the_rest_of_the_pass() {
    init();
    let (state, config) = mock_target().await;
    state.set_reject_preserve(true);

    let mut workload =
        WorkloadLoop::with_parts(config, EntropyDecisions::seeded(7), fixed_probe(5.0, 10.0));
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    let handle = tokio::spawn(async move { workload.run(shutdown).await });

    // The first reservation fails, so the loop is in its recovery pause and
    // nothing after the reserve step ran.
    tokio::time::sleep(Duration::from_millis(500)).await;
    trigger.cancel();
    handle.await.unwrap();

    assert!(state.orders().is_empty());
}
