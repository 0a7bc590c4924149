//! The throttled top-level run loop.
//!
//! Each iteration samples host resources, then either pauses (Throttled) or
//! runs one full pass of scenarios (Executing). Any failure in the pass lands
//! in a single recovery path: log the kind, pause, move on. The loop runs
//! until the supplied cancellation token fires.

use crate::client::{status, QueryClient};
use crate::config::{
    WorkloadConfig, CPU_THROTTLE_PERCENT, FOOD_SAMPLE_TRIP, MEMORY_DEGRADED_PERCENT,
    MEMORY_THROTTLE_PERCENT, RECOVERY_PAUSE,
};
use crate::decide::{DecisionMaker, EntropyDecisions};
use crate::error::Result;
use crate::monitor::{ResourceProbe, ResourceSample, SysinfoMonitor};
use crate::scenario::ScenarioRunner;
use crate::session::Session;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Per-iteration loop state, passed into and returned from each step.
///
/// `degraded` is computed from memory pressure every iteration but consumed by
/// nothing yet; it is carried here explicitly rather than as ambient state so
/// its unused status stays visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopState {
    pub iteration: u64,
    pub degraded: bool,
}

pub struct WorkloadLoop<D = EntropyDecisions, P = SysinfoMonitor> {
    client: QueryClient,
    config: WorkloadConfig,
    decisions: D,
    probe: P,
}

impl WorkloadLoop {
    pub fn new(config: WorkloadConfig) -> Self {
        Self::with_parts(config, EntropyDecisions::new(), SysinfoMonitor::new())
    }
}

impl<D: DecisionMaker, P: ResourceProbe> WorkloadLoop<D, P> {
    pub fn with_parts(config: WorkloadConfig, decisions: D, probe: P) -> Self {
        Self {
            client: QueryClient::new(&config),
            config,
            decisions,
            probe,
        }
    }

    /// Run iterations until the token is cancelled. Cancellation is observed
    /// between iterations; there is no drain phase.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        let mut state = LoopState::default();
        while !shutdown.is_cancelled() {
            state = self.iterate(state).await;
        }
        info!(iterations = state.iteration, "workload loop stopped");
    }

    async fn iterate(&mut self, state: LoopState) -> LoopState {
        let sample = self.probe.sample().await;

        if is_throttled(&sample) {
            warn!(
                cpu = sample.cpu_percent,
                memory = sample.memory_percent,
                "high host utilization, pausing workload"
            );
            sleep(RECOVERY_PAUSE).await;
            return LoopState {
                iteration: state.iteration + 1,
                ..state
            };
        }

        let degraded = is_degraded(&sample);
        if degraded {
            debug!(
                memory = sample.memory_percent,
                "memory pressure approaching the throttle threshold"
            );
        }

        if let Err(err) = self.execute().await {
            error!(
                kind = err.kind(),
                error = %err,
                "iteration failed, backing off"
            );
            sleep(RECOVERY_PAUSE).await;
        }

        LoopState {
            iteration: state.iteration + 1,
            degraded,
        }
    }

    /// One full pass of scenarios, in fixed order. The first error abandons
    /// the rest of the pass.
    async fn execute(&mut self) -> Result<()> {
        let session = Session::establish(&self.client).await?;
        let mut runner = ScenarioRunner::new(&self.client, &self.config, &mut self.decisions);

        runner.reserve_ticket(&session).await?;

        self.client
            .query_cheapest(&session, &self.config.high_speed_route, &self.config.travel_date)
            .await?;
        self.client
            .query_food(
                &session,
                &self.config.high_speed_route,
                &self.config.travel_date,
                FOOD_SAMPLE_TRIP,
            )
            .await?;
        self.client.query_assurances(&session).await?;

        runner.collect_ticket(&session).await?;

        let unpaid = self
            .client
            .query_orders(&session, &[status::UNPAID], false)
            .await?;
        runner.pay_order(&session, &unpaid).await?;
        runner.cancel_order(&session, None).await?;

        Ok(())
    }
}

fn is_throttled(sample: &ResourceSample) -> bool {
    // The 99.5 memory boundary itself counts as saturated.
    sample.cpu_percent > CPU_THROTTLE_PERCENT || sample.memory_percent >= MEMORY_THROTTLE_PERCENT
}

fn is_degraded(sample: &ResourceSample) -> bool {
    sample.memory_percent > MEMORY_DEGRADED_PERCENT
}
