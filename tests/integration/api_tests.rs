//! API integration tests
//!
//! These run against a live server backed by PostgreSQL.

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create an author with a unique email and return its id
async fn create_author(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", Uuid::new_v4()),
            "nationality": "Argentina",
            "birthYear": "1899"
        }))
        .send()
        .await
        .expect("Failed to create author");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse author");
    body["id"].as_str().expect("No id in response").to_string()
}

async fn create_book(client: &Client, author_id: &str, book: Value) -> reqwest::Response {
    let mut book = book;
    book["authorId"] = json!(author_id);
    client
        .post(format!("{}/books", BASE_URL))
        .json(&book)
        .send()
        .await
        .expect("Failed to send request")
}

async fn delete_author(client: &Client, id: &str) {
    client
        .delete(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to delete author");
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = Client::new();
    let id = create_author(&client, "Jorge Luis Borges").await;

    // Partial update: only birthYear changes
    let response = client
        .put(format!("{}/authors/{}", BASE_URL, id))
        .json(&json!({ "birthYear": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["birthYear"].is_null());
    assert_eq!(body["name"], "Jorge Luis Borges");
    assert_eq!(body["nationality"], "Argentina");

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["_count"]["books"], 0);

    delete_author(&client, &id).await;

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_author_email() {
    let client = Client::new();
    let email = format!("{}@example.com", Uuid::new_v4());

    let first = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "name": "Julio Cortázar", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);
    let first: Value = first.json().await.expect("Failed to parse response");

    let second = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "name": "Otro", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    delete_author(&client, first["id"].as_str().unwrap()).await;
}

#[tokio::test]
#[ignore]
async fn test_book_validation() {
    let client = Client::new();
    let author_id = create_author(&client, "Alfonsina Storni").await;

    let response = create_book(&client, &author_id, json!({ "title": "Ab" })).await;
    assert_eq!(response.status(), 400);

    let response = create_book(&client, &author_id, json!({ "title": "Ocre", "pages": 0 })).await;
    assert_eq!(response.status(), 400);

    let response = create_book(&client, "no-such-author", json!({ "title": "Ocre" })).await;
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/authors/{}/books", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["totalBooks"], 0);

    delete_author(&client, &author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn() {
    let client = Client::new();
    let author_id = create_author(&client, "Juan Rulfo").await;
    let isbn = Uuid::new_v4().to_string();

    let response = create_book(
        &client,
        &author_id,
        json!({ "title": "Pedro Páramo", "isbn": isbn }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let response = create_book(
        &client,
        &author_id,
        json!({ "title": "El llano en llamas", "isbn": isbn }),
    )
    .await;
    assert_eq!(response.status(), 409);

    let response = client
        .get(format!("{}/authors/{}/books", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["totalBooks"], 1);
    assert_eq!(body["books"][0]["title"], "Pedro Páramo");

    delete_author(&client, &author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_author_stats() {
    let client = Client::new();
    let author_id = create_author(&client, "Gabriela Mistral").await;

    for (title, pages, year) in [
        ("Desolación", json!(100), 2001),
        ("Ternura", Value::Null, 1999),
        ("Tala", json!(300), 2010),
    ] {
        let response = create_book(
            &client,
            &author_id,
            json!({ "title": title, "pages": pages, "publishedYear": year }),
        )
        .await;
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/authors/{}/stats", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let stats: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(stats["totalBooks"], 3);
    assert_eq!(stats["firstBook"], json!({ "title": "Ternura", "year": 1999 }));
    assert_eq!(stats["latestBook"], json!({ "title": "Tala", "year": 2010 }));
    assert_eq!(stats["averagePages"], 133);
    assert_eq!(stats["longestBook"]["title"], "Tala");
    assert_eq!(stats["shortestBook"]["title"], "Desolación");

    delete_author(&client, &author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_search_pagination() {
    let client = Client::new();
    let marker = Uuid::new_v4().simple().to_string();
    let author_id = create_author(&client, &format!("Autor {}", marker)).await;

    for n in 0..3 {
        let response = create_book(
            &client,
            &author_id,
            json!({ "title": format!("Libro {} {}", marker, n) }),
        )
        .await;
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .query(&[
            ("search", marker.as_str()),
            ("limit", "2"),
            ("sortBy", "title"),
            ("order", "asc"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], true);
    assert_eq!(body["pagination"]["hasPrev"], false);
    assert_eq!(body["data"][0]["title"], format!("Libro {} 0", marker));
    assert_eq!(body["data"][0]["author"]["id"], author_id.as_str());

    let response = client
        .get(format!("{}/books/search?limit=1000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["limit"], 50);

    let response = client
        .get(format!("{}/books/search?sortBy=secret", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    delete_author(&client, &author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_book_twice() {
    let client = Client::new();
    let author_id = create_author(&client, "Horacio Quiroga").await;

    let response = create_book(&client, &author_id, json!({ "title": "Cuentos de la selva" })).await;
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_str().expect("No id in response");

    let first = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 200);

    let second = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 404);

    delete_author(&client, &author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_author_removes_books() {
    let client = Client::new();
    let author_id = create_author(&client, "Roberto Arlt").await;

    let response = create_book(&client, &author_id, json!({ "title": "Los siete locos" })).await;
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_str().expect("No id in response").to_string();

    delete_author(&client, &author_id).await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
