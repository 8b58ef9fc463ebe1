use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

const ECHOED_CREATE_ID: i64 = 11;

#[derive(Clone, Default)]
struct ServerState {
    records: Arc<Mutex<Vec<Record>>>,
    created: Arc<Mutex<Vec<RecordDraft>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
}

async fn list_records(State(state): State<ServerState>) -> Json<Vec<Record>> {
    Json(state.records.lock().await.clone())
}

// Mirrors the live backend, which acknowledges every create with the
// same fixed id.
async fn create_record(
    State(state): State<ServerState>,
    Json(draft): Json<RecordDraft>,
) -> Json<Record> {
    state.created.lock().await.push(draft.clone());
    Json(Record {
        id: RecordId(ECHOED_CREATE_ID),
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
    })
}

async fn update_record(Path(id): Path<i64>, Json(draft): Json<RecordDraft>) -> Json<Record> {
    Json(Record {
        id: RecordId(id),
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
    })
}

async fn delete_record(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    state.deleted.lock().await.push(id);
    StatusCode::OK
}

async fn spawn_record_server(records: Vec<Record>) -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = ServerState {
        records: Arc::new(Mutex::new(records)),
        ..Default::default()
    };
    let app = Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", put(update_record).delete(delete_record))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

async fn spawn_failing_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn record(id: i64, name: &str) -> Record {
    Record {
        id: RecordId(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
    }
}

#[tokio::test]
async fn fetch_all_parses_the_remote_collection() {
    let (server_url, _state) =
        spawn_record_server(vec![record(1, "Ann"), record(2, "Bob")]).await;
    let store = HttpRecordStore::new(server_url);

    let records = store.fetch_all().await.expect("fetch_all");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId(1));
    assert_eq!(records[1].name, "Bob");
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let server_url = spawn_failing_server().await;
    let store = HttpRecordStore::new(server_url);

    let err = store.fetch_all().await.unwrap_err();
    assert!(
        matches!(err, NetworkError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR)
    );
}

#[tokio::test]
async fn transport_failure_maps_to_transport_error() {
    // Bind then drop to obtain a port with nothing listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let store = HttpRecordStore::new(format!("http://{addr}"));
    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, NetworkError::Transport(_)));
}

#[tokio::test]
async fn create_posts_the_draft_and_returns_the_server_record() {
    let (server_url, state) = spawn_record_server(Vec::new()).await;
    let store = HttpRecordStore::new(server_url);
    let draft = RecordDraft::new("Ann", "a@b.com", "123");

    let created = store.create(&draft).await.expect("create");
    assert_eq!(created.id, RecordId(ECHOED_CREATE_ID));
    assert_eq!(created.name, "Ann");
    assert_eq!(state.created.lock().await.as_slice(), &[draft]);
}

#[tokio::test]
async fn update_and_delete_address_one_path_segment_per_id() {
    let (server_url, state) = spawn_record_server(Vec::new()).await;
    let store = HttpRecordStore::new(format!("{server_url}/"));

    let updated = store
        .update(RecordId(4), &RecordDraft::new("Ann", "a@b.com", "123"))
        .await
        .expect("update");
    assert_eq!(updated.id, RecordId(4));

    store.delete(RecordId(9)).await.expect("delete");
    assert_eq!(state.deleted.lock().await.as_slice(), &[9]);
}

#[tokio::test]
async fn end_to_end_create_against_an_empty_collection() {
    let (server_url, state) = spawn_record_server(Vec::new()).await;
    let mut controller = RecordListController::new(HttpRecordStore::new(server_url));
    controller.load().await.expect("load");
    assert_eq!(controller.view().total_count, 0);

    let id = controller
        .create(RecordDraft::new("Ann", "a@b.com", "123"))
        .await
        .expect("create");
    // Empty collection, so the local id falls back to a timestamp rather
    // than the fixed id the server echoed.
    assert!(id.0 > 1_600_000_000_000);

    let view = controller.view();
    assert_eq!(view.total_count, 1);
    assert_eq!(view.visible[0].name, "Ann");
    assert_eq!(state.created.lock().await.len(), 1);
}

#[tokio::test]
async fn end_to_end_delete_over_http_adjusts_pagination() {
    let records: Vec<Record> = (1..=6).map(|i| record(i, &format!("Person {i}"))).collect();
    let (server_url, state) = spawn_record_server(records).await;
    let mut controller = RecordListController::new(HttpRecordStore::new(server_url));
    controller.load().await.expect("load");
    controller.set_page(2);

    controller.delete(RecordId(6)).await.expect("delete");
    let view = controller.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.total_pages, 1);
    assert_eq!(state.deleted.lock().await.as_slice(), &[6]);
}
