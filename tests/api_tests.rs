//! API integration tests
//!
//! These run against a live server with the seeded admin account.

use reqwest::{redirect::Policy, Client};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Client that surfaces 303 responses instead of following them
fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_catalog_index_counts_visits() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let response = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let first: Value = response.json().await.expect("Failed to parse response");
    assert!(first["num_books"].is_number());
    assert!(first["num_instances_available"].is_number());
    let first_visits = first["num_visits"].as_i64().expect("No visit count");

    // Same cookie jar, so the counter advances
    let response = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["num_visits"].as_i64(), Some(first_visits + 1));
}

#[tokio::test]
#[ignore]
async fn test_catalog_index_word_search() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog?contains=fiction", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["requested_word"], "fiction");
    assert!(body["matching_genres"].is_array());
    assert!(body["matching_books"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?page=1&per_page=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert!(body["items"].as_array().map(|a| a.len() <= 5).unwrap_or(false));
}

#[tokio::test]
#[ignore]
async fn test_book_detail_requires_login() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_my_loans() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_all_borrowed_sorted_by_due_date() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let loans = body.as_array().expect("Expected an array");
    let due_dates: Vec<&str> = loans
        .iter()
        .filter_map(|l| l["due_back"].as_str())
        .collect();
    let mut sorted = due_dates.clone();
    sorted.sort();
    assert_eq!(due_dates, sorted);
}

#[tokio::test]
#[ignore]
async fn test_renewal_workflow() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    // Need a borrowed copy to renew
    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let loans: Value = response.json().await.expect("Failed to parse response");
    let Some(loan) = loans.as_array().and_then(|a| a.first()) else {
        return;
    };
    let instance_id = loan["id"].as_str().expect("No instance ID").to_string();

    // The form proposes a date three weeks out
    let response = client
        .get(format!("{}/instances/{}/renewal", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let form: Value = response.json().await.expect("Failed to parse response");
    let proposed = form["proposed_due_back"].as_str().expect("No proposed date");
    let expected = chrono::Utc::now().date_naive() + chrono::Duration::weeks(3);
    assert_eq!(proposed, expected.to_string());

    // Submitting the proposal succeeds and redirects to the borrowed list
    let response = client
        .post(format!("{}/instances/{}/renewal", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": proposed }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 303);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header");
    assert_eq!(location, "/api/v1/loans/borrowed");
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejects_date_beyond_max() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let loans: Value = response.json().await.expect("Failed to parse response");
    let Some(loan) = loans.as_array().and_then(|a| a.first()) else {
        return;
    };
    let instance_id = loan["id"].as_str().expect("No instance ID").to_string();

    let too_far = chrono::Utc::now().date_naive() + chrono::Duration::weeks(5);
    let response = client
        .post(format!("{}/instances/{}/renewal", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": too_far.to_string() }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .expect("No message")
        .contains("invalid renewal date - beyond max"));
}

#[tokio::test]
#[ignore]
async fn test_renewal_unknown_instance_is_404() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!(
            "{}/instances/00000000-0000-0000-0000-000000000000/renewal",
            BASE_URL
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": "2099-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_author_delete_nulls_book_reference() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    // Create an author and a book referencing them
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Temp",
            "last_name": "Author"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.expect("Failed to parse response");
    let author_id = author["id"].as_i64().expect("No author ID");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Temp Book",
            "author_id": author_id,
            "isbn": "9780000000001"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    // Delete the author; the book survives with a nulled reference
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 303);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["author_id"].is_null());

    // Cleanup
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_admin_genre_crud() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Create
    let response = client
        .post(format!("{}/admin/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Integration Test Genre" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let genre: Value = response.json().await.expect("Failed to parse response");
    let genre_id = genre["id"].as_i64().expect("No genre ID");

    // Update
    let response = client
        .put(format!("{}/admin/genres/{}", BASE_URL, genre_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Renamed Genre" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["name"], "Renamed Genre");

    // Delete
    let response = client
        .delete(format!("{}/admin/genres/{}", BASE_URL, genre_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_admin_requires_staff() {
    let client = Client::new();

    let response = client
        .get(format!("{}/admin/genres", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
