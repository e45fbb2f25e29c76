//! @ai:module:intent Benchmark definition model and loading
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkDefinition, SubTest, WorkItem, OptionPair, ColumnSpec, DefinitionLoader

pub mod loader;
pub mod model;
pub mod xml;

pub use loader::DefinitionLoader;
pub use model::{
    flatten_options, merge_options, BenchmarkDefinition, ColumnSpec, DefinitionFile, OptionPair,
    SubTest, WorkItem,
};
