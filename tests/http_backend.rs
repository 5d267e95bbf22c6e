use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use regcheck_client::app::RegcheckApp;
use regcheck_client::backend::{HttpBackend, ResolutionBackend, SearchReply, StaticResource, StaticResources};
use regcheck_client::clipboard::MemoryClipboard;
use regcheck_client::config::ClientConfig;
use regcheck_client::coordinator::LookupOutcome;
use regcheck_client::error::RegcheckError;
use regcheck_client::modal::FETCH_FAILED;
use serde_json::{Value, json};

async fn search(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["text"].as_str().unwrap_or_default() {
        "benzene" => (
            StatusCode::OK,
            Json(json!({
                "original": "benzene",
                "english_name": "benzene",
                "smiles": "c1ccccc1",
                "regulations": [
                    { "law": "PRTR", "name": "Class 1", "description": "benzene", "detected_type": "exact match" }
                ]
            })),
        ),
        "unknownium" => (
            StatusCode::OK,
            Json(json!({ "english_name": "unknownium", "smiles": null, "regulations": [], "message": "SMILES conversion failed" })),
        ),
        "" => (StatusCode::BAD_REQUEST, Json(json!({ "error": "please enter some text" }))),
        other => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": format!("cannot resolve {other}") }))),
    }
}

async fn serve() -> SocketAddr {
    let router = Router::new()
        .route("/api/search", post(search))
        .route("/garbled/api/search", post(|| async { (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>") }))
        .route("/static/laws.txt", get(|| async { "PRTR Act\nChemical Substances Control Law" }))
        .route("/static/news.txt", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig { base_url: format!("http://{addr}"), request_timeout_ms: Some(5000), ..ClientConfig::default() }
}

#[tokio::test]
async fn backend_speaks_the_search_protocol() {
    let backend = HttpBackend::from_config(&config_for(serve().await)).unwrap();

    match backend.search("benzene").await.unwrap() {
        SearchReply::Found(result) => {
            assert_eq!(result.translated_name, "benzene");
            assert_eq!(result.structure_code.as_deref(), Some("c1ccccc1"));
            assert_eq!(result.regulations.len(), 1);
            assert_eq!(result.original.as_deref(), Some("benzene"));
        }
        other => panic!("unexpected reply {other:?}"),
    }
    // error bodies arrive with 4xx/5xx statuses and are still application errors
    assert_eq!(backend.search("").await.unwrap(), SearchReply::Rejected("please enter some text".into()));
    assert_eq!(backend.search("xyz").await.unwrap(), SearchReply::Rejected("cannot resolve xyz".into()));
}

#[tokio::test]
async fn non_json_body_is_a_transport_class_error() {
    let addr = serve().await;
    let config = ClientConfig { search_path: "/garbled/api/search".into(), ..config_for(addr) };
    let backend = HttpBackend::from_config(&config).unwrap();
    assert!(matches!(backend.search("benzene").await, Err(RegcheckError::Decode(_))));
}

#[tokio::test]
async fn static_resources_honour_status() {
    let backend = HttpBackend::from_config(&config_for(serve().await)).unwrap();
    assert_eq!(
        backend.fetch_text(StaticResource::SupportedLaws).await.unwrap(),
        "PRTR Act\nChemical Substances Control Law"
    );
    assert!(matches!(
        backend.fetch_text(StaticResource::Announcements).await,
        Err(RegcheckError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn app_over_http_renders_and_reports_failures() {
    let app = RegcheckApp::connect(config_for(serve().await)).unwrap();

    assert_eq!(app.coordinator().lookup("benzene").await, Some(LookupOutcome::Rendered));
    assert!(app.page().result.markup().contains("<li><strong>PRTR</strong> : Class 1"));

    assert_eq!(app.coordinator().lookup("unknownium").await, Some(LookupOutcome::Rendered));
    let markup = app.page().result.markup();
    assert!(markup.contains("<strong>SMILES:</strong> Could not convert"));
    assert!(markup.contains("SMILES conversion failed"));

    assert_eq!(app.coordinator().lookup("xyz").await, Some(LookupOutcome::ApplicationError));
    assert!(app.page().result.markup().contains("cannot resolve xyz"));

    app.show_supported_laws().await.unwrap().unwrap();
    assert_eq!(app.modal().state().body, "PRTR Act<br>Chemical Substances Control Law");

    assert!(app.show_announcements().await.unwrap().is_err());
    let state = app.modal().state();
    assert_eq!(state.body, FETCH_FAILED);
    assert!(state.is_open);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = Arc::new(HttpBackend::from_config(&config_for(addr)).unwrap());
    let app = RegcheckApp::new(config_for(addr), backend.clone(), backend, Arc::new(MemoryClipboard::new())).unwrap();
    assert_eq!(app.coordinator().lookup("benzene").await, Some(LookupOutcome::TransportError));
    assert!(!app.page().copy_button.visible);

    let fetched = app.show_supported_laws().await.unwrap();
    assert!(matches!(fetched, Err(RegcheckError::Transport(_))));
    let state = app.modal().state();
    assert_eq!(state.title, "Supported regulations");
    assert_eq!(state.body, FETCH_FAILED);
    assert!(state.is_open);
}
