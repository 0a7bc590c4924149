#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod decide;
pub mod error;
pub mod monitor;
pub mod scenario;
pub mod session;
pub mod workload;

pub use config::WorkloadConfig;
pub use error::{Error, Result};
pub use workload::WorkloadLoop;

pub mod prelude {
    pub use crate::client::QueryClient;
    pub use crate::config::WorkloadConfig;
    pub use crate::decide::{DecisionMaker, EntropyDecisions};
    pub use crate::error::{Error, Result};
    pub use crate::monitor::{ResourceProbe, ResourceSample, SysinfoMonitor};
    pub use crate::scenario::ScenarioRunner;
    pub use crate::session::Session;
    pub use crate::workload::WorkloadLoop;
}
