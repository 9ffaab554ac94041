use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct ClassifyServerState {
    status: StatusCode,
    body: &'static str,
    received: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

async fn handle_classify(
    State(state): State<ClassifyServerState>,
    mut multipart: Multipart,
) -> (StatusCode, &'static str) {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.received.lock().await.push(fields);
    (state.status, state.body)
}

async fn spawn_classify_server(
    status: StatusCode,
    body: &'static str,
) -> Result<(String, Arc<Mutex<Vec<Vec<ReceivedField>>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ClassifyServerState {
        status,
        body,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/classify-image", post(handle_classify))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

fn cat_photo() -> SelectedImage {
    SelectedImage::new("cat.png", "image/png", b"\x89PNG cat pixels".to_vec())
}

#[test]
fn joins_classify_path_onto_bare_host() {
    let endpoint = classify_endpoint("https://api.imageaibysaamer.com").expect("endpoint");
    assert_eq!(
        endpoint.as_str(),
        "https://api.imageaibysaamer.com/classify-image"
    );
}

#[test]
fn keeps_base_path_prefix_and_trailing_slash() {
    let endpoint = classify_endpoint("http://localhost:5000/v1/").expect("endpoint");
    assert_eq!(endpoint.as_str(), "http://localhost:5000/v1/classify-image");

    let endpoint = classify_endpoint(" http://localhost:5000/v1 ").expect("endpoint");
    assert_eq!(endpoint.as_str(), "http://localhost:5000/v1/classify-image");
}

#[test]
fn rejects_unparseable_base_url() {
    let err = classify_endpoint("not a url").unwrap_err();
    assert!(err.to_string().contains("invalid classifier base url"));
}

#[tokio::test]
async fn posts_single_image_field_and_resolves_index() {
    let (server_url, received) = spawn_classify_server(StatusCode::OK, r#"{"class": 3}"#)
        .await
        .expect("spawn server");
    let classifier = HttpClassifier::new(&server_url).expect("classifier");

    let class = classifier.classify(&cat_photo()).await;
    assert_eq!(class, Ok(ImageClass::Cat));

    let requests = received.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        vec![ReceivedField {
            name: "image".to_string(),
            file_name: Some("cat.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: b"\x89PNG cat pixels".to_vec(),
        }]
    );
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let (server_url, _received) =
        spawn_classify_server(StatusCode::INTERNAL_SERVER_ERROR, "boom")
            .await
            .expect("spawn server");
    let classifier = HttpClassifier::new(&server_url).expect("classifier");

    let err = classifier.classify(&cat_photo()).await.unwrap_err();
    assert_eq!(err, ClassifyError::Status(500));
}

#[tokio::test]
async fn unparsable_success_body_is_a_decode_error() {
    let (server_url, _received) = spawn_classify_server(StatusCode::OK, "definitely not json")
        .await
        .expect("spawn server");
    let classifier = HttpClassifier::new(&server_url).expect("classifier");

    let err = classifier.classify(&cat_photo()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn out_of_range_index_is_rejected() {
    let (server_url, _received) = spawn_classify_server(StatusCode::OK, r#"{"class": 10}"#)
        .await
        .expect("spawn server");
    let classifier = HttpClassifier::new(&server_url).expect("classifier");

    let err = classifier.classify(&cat_photo()).await.unwrap_err();
    assert_eq!(err, ClassifyError::UnknownClass(10));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let classifier = HttpClassifier::new(&format!("http://{addr}")).expect("classifier");
    let err = classifier.classify(&cat_photo()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Transport(_)), "got {err:?}");
}
