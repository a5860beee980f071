//! The create/retrieve/update/delete scenario.
//!
//! Steps run strictly in order and the first failure stops the run. The
//! item handle returned by create is what retrieve, update and delete take,
//! so none of them can run without a successful create before it.
//!
//! ```text
//! Empty -> Created -> Retrieved -> Updated -> Deleted -> Empty
//! ```

use std::fmt;
use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::assertions::{
    expect_empty_array, expect_field, expect_item, expect_json_ok, expect_string_field,
};
use crate::client::TodoClient;
use crate::config::{HarnessConfig, IdExpectation};
use crate::error::ConformanceError;
use crate::model::{NewTodo, TodoItem, TodoReplacement};
use crate::report::ScenarioReport;

/// Title sent by the create step.
pub const CREATED_TITLE: &str = "sample item";
/// Title sent by the update step.
pub const UPDATED_TITLE: &str = "updated item";

/// Scenario name used in reports.
pub const SCENARIO_NAME: &str = "create an entry and retrieve it";

/// A step of the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ListBefore,
    Create,
    Retrieve,
    Update,
    Delete,
    ListAfter,
}

impl Step {
    /// Every step in execution order.
    pub const ALL: [Step; 6] = [
        Step::ListBefore,
        Step::Create,
        Step::Retrieve,
        Step::Update,
        Step::Delete,
        Step::ListAfter,
    ];

    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Step::ListBefore => "list before",
            Step::Create => "create",
            Step::Retrieve => "retrieve",
            Step::Update => "update",
            Step::Delete => "delete",
            Step::ListAfter => "list after",
        }
    }

    /// Human readable description used in reports.
    pub fn description(self) -> &'static str {
        match self {
            Step::ListBefore => "database must be empty",
            Step::Create => "create an item",
            Step::Retrieve => "retrieve an item",
            Step::Update => "update an item",
            Step::Delete => "delete an item",
            Step::ListAfter => "database should be empty",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of `order` values for one run.
///
/// Starts at 1 and hands out each value once, so later steps always get a
/// strictly larger order than earlier ones.
#[derive(Debug, Clone)]
pub struct OrderCounter {
    next: i64,
}

impl Default for OrderCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl OrderCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value and advances the counter.
    pub fn next_order(&mut self) -> i64 {
        let order = self.next;
        self.next += 1;
        order
    }
}

/// An item the server has accepted, as the harness last observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTodo {
    /// Id returned by create; used to address the item
    pub id: String,
    /// Expected state, with the id the responses must report
    pub expected: TodoItem,
}

/// The scenario runner.
#[derive(Debug, Clone)]
pub struct Scenario {
    client: TodoClient,
    id_expectation: IdExpectation,
}

impl Scenario {
    /// Creates a runner for the server in `config`.
    pub fn new(config: &HarnessConfig) -> Result<Self, ConformanceError> {
        Ok(Self {
            client: TodoClient::new(config)?,
            id_expectation: config.id_expectation.clone(),
        })
    }

    /// Runs every step in order and reports each outcome.
    ///
    /// Never returns early: a failed step is recorded, and the steps after
    /// it are reported as skipped.
    pub async fn run(&self) -> ScenarioReport {
        let mut report = ScenarioReport::new(SCENARIO_NAME);
        tracing::info!(scenario = SCENARIO_NAME, "Starting scenario");

        match self.drive(&mut report).await {
            Ok(()) => tracing::info!(scenario = SCENARIO_NAME, "Scenario passed"),
            Err(err) => {
                tracing::error!(scenario = SCENARIO_NAME, error = %err, "Scenario failed");
                report.skip_remaining();
            }
        }
        report
    }

    async fn drive(&self, report: &mut ScenarioReport) -> Result<(), ConformanceError> {
        let mut orders = OrderCounter::new();

        timed(report, Step::ListBefore, self.list_empty(Step::ListBefore)).await?;
        let created = timed(report, Step::Create, self.create(&mut orders)).await?;
        let retrieved = timed(report, Step::Retrieve, self.retrieve(&created)).await?;
        let updated = timed(report, Step::Update, self.update(&retrieved, &mut orders)).await?;
        timed(report, Step::Delete, self.delete(updated)).await?;
        timed(report, Step::ListAfter, self.list_empty(Step::ListAfter)).await?;
        Ok(())
    }

    /// Lists the collection and requires it to be empty.
    pub async fn list_empty(&self, step: Step) -> Result<(), ConformanceError> {
        let exchange = self.client.list(step).await?;
        let body = expect_json_ok(step, &exchange)?;
        expect_empty_array(step, &body)
    }

    /// Creates the sample item and returns its handle.
    pub async fn create(&self, orders: &mut OrderCounter) -> Result<TrackedTodo, ConformanceError> {
        let step = Step::Create;
        let todo = NewTodo {
            title: CREATED_TITLE.to_string(),
            completed: false,
            order: orders.next_order(),
        };

        let exchange = self.client.create(step, &todo).await?;
        let body = expect_json_ok(step, &exchange)?;
        let id = expect_string_field(step, &body, "id")?.to_string();
        expect_field(step, &body, "title", &Value::from(CREATED_TITLE))?;

        let expected = TodoItem {
            id: self.id_expectation.expected(&id).to_string(),
            title: todo.title,
            completed: todo.completed,
            order: todo.order,
        };
        tracing::debug!(%id, order = todo.order, "Created item");
        Ok(TrackedTodo { id, expected })
    }

    /// Reads the item back and requires every field to match.
    pub async fn retrieve(&self, item: &TrackedTodo) -> Result<TrackedTodo, ConformanceError> {
        let step = Step::Retrieve;
        let exchange = self.client.get(step, &item.id).await?;
        let body = expect_json_ok(step, &exchange)?;
        expect_item(step, &body, &item.expected)?;
        Ok(item.clone())
    }

    /// Replaces the item with the updated title, completed and a fresh order.
    pub async fn update(
        &self,
        item: &TrackedTodo,
        orders: &mut OrderCounter,
    ) -> Result<TrackedTodo, ConformanceError> {
        let step = Step::Update;
        let replacement = TodoReplacement {
            id: item.id.clone(),
            title: UPDATED_TITLE.to_string(),
            completed: true,
            order: orders.next_order(),
        };

        let exchange = self.client.replace(step, &item.id, &replacement).await?;
        let body = expect_json_ok(step, &exchange)?;

        let expected = TodoItem {
            id: item.expected.id.clone(),
            title: replacement.title,
            completed: replacement.completed,
            order: replacement.order,
        };
        expect_item(step, &body, &expected)?;
        Ok(TrackedTodo {
            id: item.id.clone(),
            expected,
        })
    }

    /// Deletes the item and requires the response to carry its last state.
    ///
    /// Consumes the handle: nothing may address the item afterwards.
    pub async fn delete(&self, item: TrackedTodo) -> Result<TodoItem, ConformanceError> {
        let step = Step::Delete;
        let exchange = self.client.delete(step, &item.id).await?;
        let body = expect_json_ok(step, &exchange)?;
        expect_item(step, &body, &item.expected)?;
        Ok(item.expected)
    }
}

async fn timed<T, F>(report: &mut ScenarioReport, step: Step, fut: F) -> Result<T, ConformanceError>
where
    F: Future<Output = Result<T, ConformanceError>>,
{
    tracing::info!(%step, "{}", step.description());
    let started = Instant::now();
    let result = fut.await;
    let elapsed = started.elapsed();

    match &result {
        Ok(_) => tracing::info!(%step, elapsed_ms = elapsed.as_millis() as u64, "Step passed"),
        Err(err) => tracing::error!(%step, error = %err, "Step failed"),
    }
    report.record(step, elapsed, result.as_ref().err());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_counter_starts_at_one_and_never_repeats() {
        let mut orders = OrderCounter::new();
        let first = orders.next_order();
        let second = orders.next_order();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert!(second > first);
    }

    #[test]
    fn test_each_run_gets_its_own_counter() {
        let mut a = OrderCounter::new();
        a.next_order();
        a.next_order();
        let mut b = OrderCounter::new();
        assert_eq!(b.next_order(), 1);
    }

    #[test]
    fn test_step_order_and_names() {
        assert_eq!(Step::ALL.first(), Some(&Step::ListBefore));
        assert_eq!(Step::ALL.last(), Some(&Step::ListAfter));
        assert_eq!(Step::ListAfter.to_string(), "list after");
        assert_eq!(Step::Create.description(), "create an item");
    }
}
