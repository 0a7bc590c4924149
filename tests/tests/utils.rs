use async_trait::async_trait;
use mock_service::MockState;
use railstorm::monitor::{ResourceProbe, ResourceSample};
use railstorm::WorkloadConfig;
use std::sync::{Arc, OnceLock};
use url::Url;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();
    ONCE_LOCK.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter("railstorm=debug,mock_service=debug")
            .init();
    });
}

/// Spawn a fresh mock service and build a config pointing at it.
#[allow(unused)]
pub async fn mock_target() -> (Arc<MockState>, WorkloadConfig) {
    let state = MockState::new();
    let addr = mock_service::spawn(state.clone()).await;
    let base_url = Url::parse(&format!("http://{addr}")).unwrap();
    (state, WorkloadConfig::new(base_url))
}

/// A probe answering every sample with the same fixed utilization.
#[allow(unused)]
pub struct FixedProbe(pub ResourceSample);

#[async_trait]
impl ResourceProbe for FixedProbe {
    async fn sample(&mut self) -> ResourceSample {
        self.0
    }
}

#[allow(unused)]
pub fn fixed_probe(cpu_percent: f64, memory_percent: f64) -> FixedProbe {
    FixedProbe(ResourceSample {
        cpu_percent,
        memory_percent,
    })
}
