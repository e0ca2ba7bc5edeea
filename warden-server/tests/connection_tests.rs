use tokio::sync::mpsc;
use warden_protocol::{Packet, StatusMessage};
use warden_server::{ConnectionHandle, ConnectionRegistry, ServerError};
use warden_types::HardwareId;

fn handle() -> (ConnectionHandle, mpsc::Receiver<Packet>) {
    let (tx, rx) = mpsc::channel(8);
    (ConnectionHandle::new(tx), rx)
}

#[test]
fn handles_get_distinct_ids() {
    let (a, _rx_a) = handle();
    let (b, _rx_b) = handle();
    assert_ne!(a.id(), b.id());
}

#[tokio::test]
async fn register_replaces_previous_connection() {
    let registry = ConnectionRegistry::new();
    let id = HardwareId::new("abc123");
    let (first, _rx1) = handle();
    let (second, _rx2) = handle();
    let first_id = first.id();

    assert!(registry.register(id.clone(), first).await.is_none());
    let replaced = registry.register(id.clone(), second.clone()).await.unwrap();

    assert_eq!(replaced.id(), first_id);
    assert_eq!(registry.connection_id(&id).await, Some(second.id()));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn stale_unregister_keeps_newer_connection() {
    let registry = ConnectionRegistry::new();
    let id = HardwareId::new("abc123");
    let (old, _rx1) = handle();
    let (new, _rx2) = handle();
    let old_id = old.id();
    let new_id = new.id();

    registry.register(id.clone(), old).await;
    registry.register(id.clone(), new).await;

    assert!(!registry.unregister(&id, old_id).await);
    assert!(registry.contains(&id).await);

    assert!(registry.unregister(&id, new_id).await);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn send_to_reaches_registered_connection() {
    let registry = ConnectionRegistry::new();
    let id = HardwareId::new("abc123");
    let (conn, mut rx) = handle();
    registry.register(id.clone(), conn).await;

    registry
        .send_to(&id, StatusMessage::ok(5).into())
        .await
        .unwrap();

    match rx.recv().await {
        Some(Packet::Status(message)) => assert_eq!(message.correlation_id, 5),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn send_to_unknown_device_fails() {
    let registry = ConnectionRegistry::new();
    let result = registry
        .send_to(&"nobody".into(), StatusMessage::ok(0).into())
        .await;
    assert!(matches!(result, Err(ServerError::NotConnected(id)) if id.as_str() == "nobody"));
}

#[tokio::test]
async fn send_after_receiver_dropped_fails() {
    let (conn, rx) = handle();
    drop(rx);
    assert!(conn.is_closed());
    let result = conn.send(StatusMessage::ok(0).into()).await;
    assert!(matches!(result, Err(ServerError::ChannelClosed)));
}
