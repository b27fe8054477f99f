use phonebook_core::{ApiErrorClass, ContactFields, DirectoryClient, RecordId};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collection_url(server: &MockServer) -> String {
    format!("{}/api/persons", server.uri())
}

#[tokio::test]
async fn list_all_returns_records_in_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/persons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "name": "Bob", "number": "040-1" },
            { "id": "a7", "name": "Ada", "number": "123" }
        ])))
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let records = client.list_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId::Number(2));
    assert_eq!(records[0].name, "Bob");
    assert_eq!(records[1].id, RecordId::Text("a7".to_string()));
    assert_eq!(records[1].number, "123");
}

#[tokio::test]
async fn list_all_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/persons"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let err = client.list_all().await.unwrap_err();

    assert_eq!(err.classification(), Some(ApiErrorClass::Transient));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn create_posts_name_and_number() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/persons"))
        .and(body_json(json!({ "name": "Grace", "number": "555" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9,
            "name": "Grace",
            "number": "555"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let record = client.create("Grace", "555").await.unwrap();

    assert_eq!(record.id, RecordId::Number(9));
    assert_eq!(record.name, "Grace");
}

#[tokio::test]
async fn remove_accepts_empty_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/persons/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    client.remove(&RecordId::Number(2)).await.unwrap();
}

#[tokio::test]
async fn remove_of_unknown_id_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/persons/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let err = client.remove(&RecordId::Number(77)).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_puts_fields_to_record_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/persons/1"))
        .and(body_json(json!({ "name": "Ada", "number": "999" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Ada",
            "number": "999"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let record = client
        .update(&RecordId::Number(1), &ContactFields::new("Ada", "999"))
        .await
        .unwrap();

    assert_eq!(record.number, "999");
}

#[tokio::test]
async fn update_of_deleted_record_reports_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/persons/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url(&collection_url(&server)).unwrap();
    let err = client
        .update(&RecordId::Number(1), &ContactFields::new("Ada", "999"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.classification(), Some(ApiErrorClass::NotFound));
}
