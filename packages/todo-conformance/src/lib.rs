//! Conformance scenario for the todo list REST API.
//!
//! Runs one ordered create/read/update/delete scenario against a live
//! server and reports the outcome of every step:
//! - `list` the empty collection
//! - `create`, `retrieve`, `update` and `delete` one item
//! - `list` again and expect the collection empty

pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod scenario;

pub use config::{HarnessConfig, IdExpectation};
pub use error::{ConfigError, ConformanceError};
pub use report::{ScenarioReport, StepOutcome, StepStatus};
pub use scenario::{OrderCounter, Scenario, Step};
