//! @ai:module:intent Wall-clock backstop for tools that outlive their CPU limit
//! @ai:module:layer infrastructure
//! @ai:module:public_api Watchdog
//! @ai:module:stateless false

use crate::runner::limits::ResourceLimits;
use std::time::Duration;
use tokio::time::Instant;

/// @ai:intent Deadline that fires a fixed grace period after the CPU limit
/// @ai:invariant an unarmed or cancelled watchdog never fires
#[derive(Debug, Default)]
pub struct Watchdog {
    deadline: Option<Instant>,
}

impl Watchdog {
    /// @ai:intent Arm a watchdog for one run, or leave it inert without a CPU limit
    /// @ai:effects clock:read
    pub fn arm(limits: &ResourceLimits, grace: Duration) -> Self {
        let deadline = limits
            .cpu_seconds()
            .map(|secs| Instant::now() + Duration::from_secs(secs) + grace);

        Self { deadline }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// @ai:intent Resolve once the deadline passes; pending forever when unarmed
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}
