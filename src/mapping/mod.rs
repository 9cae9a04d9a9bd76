//! Change propagation between flattened schemas
//!
//! A [`Mapper`] is compiled from [`MappingRule`]s of the form "when this source
//! field changes, recompute these destination fields". Rules can be stated
//! directly with typed identifiers or by path through a [`RuleTable`].

pub mod error;
pub mod mapper;
pub mod rule;
pub mod table;
pub mod types;

pub use error::{MappingError, MappingResult};
pub use mapper::Mapper;
pub use rule::MappingRule;
pub use table::{RuleEntry, RuleTable};
pub use types::MappingStats;

