//! Scenario runs against the in-memory reference server.

use std::net::SocketAddr;
use std::sync::Arc;

use todo_api::config::ApiConfig;
use todo_api::model::NewTodo as StoredTodo;
use todo_api::router::Router;
use todo_api::server::Server;
use todo_api::store::TodoStore;

use todo_conformance::client::TodoClient;
use todo_conformance::model::TodoItem;
use todo_conformance::{
    ConformanceError, HarnessConfig, IdExpectation, OrderCounter, Scenario, Step, StepStatus,
};

async fn spawn_reference_server(store: Arc<TodoStore>) -> String {
    let router = Router::new(store, Arc::new(ApiConfig::default()));
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = Server::bind(addr, router).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    format!("http://{}", addr)
}

fn config(base_url: &str, id_expectation: IdExpectation) -> HarnessConfig {
    HarnessConfig::new(base_url)
        .unwrap()
        .with_id_expectation(id_expectation)
}

fn status(report: &todo_conformance::ScenarioReport, step: Step) -> StepStatus {
    report.outcome(step).unwrap().status.clone()
}

#[tokio::test]
async fn test_full_scenario_on_fresh_server() {
    let store = Arc::new(TodoStore::new());
    let base = spawn_reference_server(store.clone()).await;

    let scenario = Scenario::new(&config(&base, IdExpectation::Literal("0".to_string()))).unwrap();
    let report = scenario.run().await;

    assert!(report.is_success(), "{}", report);
    assert_eq!(report.passed_count(), Step::ALL.len());
    let steps: Vec<Step> = report.steps.iter().map(|o| o.step).collect();
    assert_eq!(steps, Step::ALL.to_vec());

    // The round trip leaves the collection as it found it.
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_steps_individually_follow_the_concrete_scenario() {
    let base = spawn_reference_server(Arc::new(TodoStore::new())).await;
    let scenario = Scenario::new(&config(&base, IdExpectation::Literal("0".to_string()))).unwrap();
    let mut orders = OrderCounter::new();

    scenario.list_empty(Step::ListBefore).await.unwrap();

    let created = scenario.create(&mut orders).await.unwrap();
    assert_eq!(created.id, "0");
    assert_eq!(
        created.expected,
        TodoItem {
            id: "0".to_string(),
            title: "sample item".to_string(),
            completed: false,
            order: 1,
        }
    );

    let retrieved = scenario.retrieve(&created).await.unwrap();
    let updated = scenario.update(&retrieved, &mut orders).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert!(updated.expected.order > created.expected.order);

    let deleted = scenario.delete(updated.clone()).await.unwrap();
    assert_eq!(
        deleted,
        TodoItem {
            id: "0".to_string(),
            title: "updated item".to_string(),
            completed: true,
            order: 2,
        }
    );
    assert_eq!(deleted, updated.expected);

    scenario.list_empty(Step::ListAfter).await.unwrap();
}

#[tokio::test]
async fn test_returned_id_expectation_survives_repeated_runs() {
    let base = spawn_reference_server(Arc::new(TodoStore::new())).await;
    let scenario = Scenario::new(&config(&base, IdExpectation::Returned)).unwrap();

    // The second run gets id "1" from the server; only the echo is checked.
    for _ in 0..2 {
        let report = scenario.run().await;
        assert!(report.is_success(), "{}", report);
    }
}

#[tokio::test]
async fn test_literal_id_mismatch_aborts_at_retrieve() {
    let store = Arc::new(TodoStore::new());
    let base = spawn_reference_server(store.clone()).await;
    let literal = Scenario::new(&config(&base, IdExpectation::Literal("0".to_string()))).unwrap();

    assert!(literal.run().await.is_success());

    // Ids are never reused, so a second run is assigned "1".
    let report = literal.run().await;
    assert!(!report.is_success());
    assert_eq!(status(&report, Step::ListBefore), StepStatus::Passed);
    assert_eq!(status(&report, Step::Create), StepStatus::Passed);
    assert_eq!(
        status(&report, Step::Retrieve),
        StepStatus::Failed("retrieve: expected field `id` to be \"0\", got \"1\"".to_string())
    );
    for step in [Step::Update, Step::Delete, Step::ListAfter] {
        assert_eq!(status(&report, step), StepStatus::Skipped);
    }

    // Nothing after the failure ran, so the item is still there.
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("1").unwrap().title, "sample item");
}

#[tokio::test]
async fn test_non_empty_collection_fails_precondition() {
    let store = Arc::new(TodoStore::new());
    store.create(StoredTodo {
        title: "left over".to_string(),
        completed: false,
        order: 9,
    });
    let base = spawn_reference_server(store.clone()).await;

    let report = Scenario::new(&config(&base, IdExpectation::Returned))
        .unwrap()
        .run()
        .await;

    assert_eq!(
        status(&report, Step::ListBefore),
        StepStatus::Failed("list before: expected collection to be empty, got 1 item(s)".to_string())
    );
    assert_eq!(report.passed_count(), 0);
    assert_eq!(report.steps.len(), Step::ALL.len());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config(&format!("http://{}", addr), IdExpectation::Returned);
    let scenario = Scenario::new(&config).unwrap();

    let err = scenario.list_empty(Step::ListBefore).await.unwrap_err();
    assert!(matches!(
        err,
        ConformanceError::Transport {
            step: Step::ListBefore,
            ..
        }
    ));

    let report = scenario.run().await;
    match &report.outcome(Step::ListBefore).unwrap().status {
        StepStatus::Failed(message) => assert!(message.starts_with("list before: transport error")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(report.steps[1..]
        .iter()
        .all(|outcome| outcome.status == StepStatus::Skipped));
}

#[tokio::test]
async fn test_unknown_item_is_reported_with_status() {
    let base = spawn_reference_server(Arc::new(TodoStore::new())).await;
    let config = config(&base, IdExpectation::Returned);
    let client = TodoClient::new(&config).unwrap();

    let exchange = client.get(Step::Retrieve, "404").await.unwrap();
    let err = todo_conformance::assertions::expect_json_ok(Step::Retrieve, &exchange).unwrap_err();
    assert_eq!(
        err.to_string(),
        "retrieve: expected status to be 200, got 404"
    );
}
