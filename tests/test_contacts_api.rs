//! Contact endpoints end to end over HTTP.

mod common;

use common::TestServer;
use serde_json::{json, Value};
use std::time::Duration;

async fn submit(server: &TestServer, name: &str) -> Value {
    let (status, body) = server
        .post(
            "/api/contacts",
            &json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "subject": "Custom order",
                "message": "Can you make a matching pair?"
            }),
        )
        .await;
    assert_eq!(status, 201, "submit failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn submit_creates_new_contact() {
    let server = TestServer::start().await;
    let (status, body) = server
        .post(
            "/api/contacts",
            &json!({
                "name": " Ada ",
                "email": "Ada@Example.com",
                "message": "Hello"
            }),
        )
        .await;

    assert_eq!(status, 201);
    assert_eq!(body["message"], "Contact submitted successfully");
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["status"], "new");
    assert!(body["data"].get("phone").is_none());
}

#[tokio::test]
async fn submit_reports_validation_errors() {
    let server = TestServer::start().await;
    let (status, body) = server
        .post("/api/contacts", &json!({ "name": "Ada", "email": "nope" }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(
        body["errors"],
        json!(["Please provide a valid email", "Message is required"])
    );
}

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    let server = TestServer::start().await;
    for name in ["Ada", "Grace", "Linus"] {
        submit(&server, name).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let (status, body) = server.get("/api/contacts?limit=2").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Linus", "Grace"]);
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 })
    );

    let (status, body) = server.get("/api/contacts?status=archived").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Status must be one of: new, read, replied");

    let (status, body) = server.get("/api/contacts?status=new&status=read").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
}

#[tokio::test]
async fn status_update_lifecycle() {
    let server = TestServer::start().await;
    let contact = submit(&server, "Ada").await;
    let path = format!("/api/contacts/{}", contact["_id"].as_str().unwrap());

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (status, body) = server.put(&path, &json!({ "status": "replied" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Contact status updated successfully");
    assert_eq!(body["data"]["status"], "replied");
    assert_ne!(body["data"]["updatedAt"], contact["updatedAt"]);

    let (_, body) = server.get("/api/contacts?status=replied").await;
    assert_eq!(body["pagination"]["total"], 1);

    let (status, body) = server.put(&path, &json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"], json!(["Status is required"]));

    let (status, body) = server.put(&path, &json!({ "status": "spam" })).await;
    assert_eq!(status, 400);
    assert_eq!(
        body["errors"],
        json!(["Status must be one of: new, read, replied"])
    );

    let (status, _) = server
        .put(
            &format!("/api/contacts/{}", uuid::Uuid::new_v4()),
            &json!({ "status": "read" }),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn get_and_delete() {
    let server = TestServer::start().await;
    let contact = submit(&server, "Grace").await;
    let path = format!("/api/contacts/{}", contact["_id"].as_str().unwrap());

    let (status, body) = server.get(&path).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["subject"], "Custom order");

    let (status, body) = server.delete(&path).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Contact deleted successfully" })
    );

    let (status, body) = server.get(&path).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Contact not found");

    let (status, body) = server.delete("/api/contacts/123").await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Server Error");
}
