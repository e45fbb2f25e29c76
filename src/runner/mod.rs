//! @ai:module:intent Tool process execution: limits, watchdog, interrupts
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunExecutor, RunOutcome, ResourceLimits, LimitKind, LimitPair, Watchdog, Interrupt

pub mod executor;
pub mod interrupt;
pub mod limits;
pub mod watchdog;

pub use executor::{RunExecutor, RunOutcome};
pub use interrupt::Interrupt;
pub use limits::{children_cpu_time, LimitKind, LimitPair, ResourceLimits};
pub use watchdog::Watchdog;
