//! Integration tests for messaging account connections

use bulk_rs::connections::{ConnectionCredential, ConnectionManager, ConnectionStatus};
use bulk_rs::{db, BulkError};

async fn setup_manager() -> ConnectionManager {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    db::init_schema(&pool).await.unwrap();
    ConnectionManager::new(pool)
}

fn credential(phone: &str) -> ConnectionCredential {
    ConnectionCredential {
        phone_number: phone.to_string(),
        business_account_id: "acct-123".to_string(),
        access_token: "secret-token".to_string(),
    }
}

#[tokio::test]
async fn test_connect_and_list() {
    let manager = setup_manager().await;

    assert!(!manager.has_active_connection("owner-1").await.unwrap());

    let connection = manager.connect("owner-1", credential("+1555")).await.unwrap();
    assert_eq!(connection.status, ConnectionStatus::Connected);
    assert_eq!(connection.phone_number, "+1555");

    let listed = manager.list_connections("owner-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, connection.id);
    assert!(manager.has_active_connection("owner-1").await.unwrap());
}

#[tokio::test]
async fn test_disconnect() {
    let manager = setup_manager().await;
    let connection = manager.connect("owner-1", credential("+1555")).await.unwrap();

    manager.disconnect("owner-1", &connection.id).await.unwrap();

    let listed = manager.list_connections("owner-1").await.unwrap();
    assert_eq!(listed[0].status, ConnectionStatus::Disconnected);
    assert!(!manager.has_active_connection("owner-1").await.unwrap());
}

#[tokio::test]
async fn test_disconnect_requires_owner() {
    let manager = setup_manager().await;
    let connection = manager.connect("owner-1", credential("+1555")).await.unwrap();

    let result = manager.disconnect("owner-2", &connection.id).await;
    assert!(matches!(result, Err(BulkError::NotFound(_))));
    assert!(manager.has_active_connection("owner-1").await.unwrap());
}

#[tokio::test]
async fn test_token_not_serialized() {
    let manager = setup_manager().await;
    let connection = manager.connect("owner-1", credential("+1555")).await.unwrap();

    let json = serde_json::to_string(&connection).unwrap();
    assert!(!json.contains("secret-token"));
    assert!(!format!("{:?}", credential("+1555")).contains("secret-token"));
}
