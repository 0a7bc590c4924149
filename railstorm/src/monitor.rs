//! Host resource sampling.

use async_trait::async_trait;
use std::time::Duration;
use sysinfo::System;
use tokio::time::sleep;

/// Window the CPU counters are averaged over. Holding the loop for this long
/// every iteration doubles as a crude natural rate limiter.
pub const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// One fresh utilization measurement; never persisted across iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Seam for the workload loop's resource sampling, so tests can force samples.
#[async_trait]
pub trait ResourceProbe: Send {
    async fn sample(&mut self) -> ResourceSample;
}

/// Live host measurements via `sysinfo`.
pub struct SysinfoMonitor {
    system: System,
}

impl SysinfoMonitor {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProbe for SysinfoMonitor {
    async fn sample(&mut self) -> ResourceSample {
        // Two CPU refreshes bracketing the window give a meaningful average;
        // memory is read instantaneously.
        self.system.refresh_cpu_usage();
        sleep(CPU_SAMPLE_WINDOW).await;
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let total = self.system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            self.system.used_memory() as f64 / total as f64 * 100.0
        };

        ResourceSample {
            cpu_percent: f64::from(self.system.global_cpu_usage()),
            memory_percent,
        }
    }
}
