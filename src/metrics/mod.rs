//! @ai:module:intent Result statistics for a harness run
//! @ai:module:layer application
//! @ai:module:public_api Statistics

pub mod statistics;

pub use statistics::Statistics;
