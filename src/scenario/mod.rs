//! Practice scenarios
//!
//! Scenarios come from static configuration grouped by program name, then
//! scenario name. The active scenario is resolved by its scenario ID, which is
//! also the agent ID the conversational engine is opened with.

mod catalog;

pub use catalog::{Scenario, ScenarioCatalog};
