use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use warden_client::{local_identity, Client, ClientError, IdentifyOutcome};
use warden_protocol::{
    read_packet, write_packet, IdentityMessage, Packet, PacketRegistry, StatusMessage,
};
use warden_server::{MemoryStore, Server, ServerState};
use warden_types::{DeviceIdentity, HardwareId, ProfileId};

async fn start_server(store: MemoryStore) -> (SocketAddr, Arc<ServerState>) {
    let state = ServerState::from_store(Arc::new(store)).await.unwrap();
    let server = Server::bind("127.0.0.1:0", state).await.unwrap();
    let addr = server.local_addr().unwrap();
    let state = Arc::clone(server.state());
    tokio::spawn(server.run());
    (addr, state)
}

/// Accepts one connection, reads one packet and answers with `reply`.
async fn scripted_server(reply: Option<Packet>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let registry = PacketRegistry::standard().unwrap();
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_packet(&mut stream, &registry).await.unwrap();
        if let Some(reply) = reply {
            write_packet(&mut stream, &registry, &reply).await.unwrap();
        }
    });
    addr
}

fn device(id: &str) -> DeviceIdentity {
    DeviceIdentity::new(HardwareId::new(id), "laptop")
}

#[tokio::test]
async fn first_contact_is_provisional() {
    let (addr, state) = start_server(MemoryStore::new()).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();

    let outcome = client.identify(&device("abc123")).await.unwrap();

    assert!(matches!(outcome, IdentifyOutcome::Provisional));
    let stored = state.devices().get(&"abc123".into()).await.unwrap();
    assert_eq!(stored.profile, ProfileId::UNASSIGNED);
}

#[tokio::test]
async fn known_device_is_recognized_with_stored_record() {
    let stored = device("abc123").with_profile(ProfileId::new(3));
    let (addr, _state) = start_server(MemoryStore::new().with_device(stored)).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();

    match client.identify(&device("abc123")).await.unwrap() {
        IdentifyOutcome::Recognized(record) => {
            assert_eq!(record.hardware_id.as_str(), "abc123");
            assert_eq!(record.profile, ProfileId::new(3));
        }
        other => panic!("expected Recognized, got {other:?}"),
    }
}

#[tokio::test]
async fn local_identity_identifies_end_to_end() {
    let (addr, state) = start_server(MemoryStore::new()).await;
    let me = local_identity("this-machine");

    let mut first = Client::connect(&addr.to_string()).await.unwrap();
    assert!(matches!(
        first.identify(&me).await.unwrap(),
        IdentifyOutcome::Provisional
    ));

    let mut second = Client::connect(&addr.to_string()).await.unwrap();
    match second.identify(&me).await.unwrap() {
        IdentifyOutcome::Recognized(record) => assert!(record.same_device(&me)),
        other => panic!("expected Recognized, got {other:?}"),
    }
    assert_eq!(state.devices().len().await, 1);
}

#[tokio::test]
async fn pushed_packets_are_delivered() {
    let (addr, state) = start_server(MemoryStore::new()).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();
    client.identify(&device("abc123")).await.unwrap();

    state
        .connections()
        .send_to(&"abc123".into(), StatusMessage::ok(42).into())
        .await
        .unwrap();

    match client.next_packet().await.unwrap() {
        Some(Packet::Status(message)) => assert_eq!(message.correlation_id, 42),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn refusal_is_an_unexpected_reply() {
    let addr = scripted_server(Some(StatusMessage::not_ok("go away", 0).into())).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();

    let result = client.identify(&device("abc123")).await;
    assert!(matches!(result, Err(ClientError::UnexpectedReply(_))));
}

#[tokio::test]
async fn identity_of_another_device_is_an_unexpected_reply() {
    let reply = IdentityMessage::new(device("someone-else")).into();
    let addr = scripted_server(Some(reply)).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();

    let result = client.identify(&device("abc123")).await;
    match result {
        Err(ClientError::UnexpectedReply(message)) => assert!(message.contains("someone-else")),
        other => panic!("expected UnexpectedReply, got {other:?}"),
    }
}

#[tokio::test]
async fn silent_close_is_connection_closed() {
    let addr = scripted_server(None).await;
    let mut client = Client::connect(&addr.to_string()).await.unwrap();

    let result = client.identify(&device("abc123")).await;
    assert!(matches!(result, Err(ClientError::ConnectionClosed)));
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = Client::connect(&addr.to_string()).await;
    assert!(matches!(result, Err(ClientError::Io(_))));
}
