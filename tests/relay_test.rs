use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use warp::ws::Message;

use voice_relay::core::connection::Connection;
use voice_relay::core::message::{ServerMessage, SignalKind};
use voice_relay::core::registry::ConnectionRegistry;
use voice_relay::core::relay::SignalRelay;
use voice_relay::error::VoiceRelayError;

async fn register(registry: &ConnectionRegistry, id: &str, user_id: &str) -> UnboundedReceiver<Message> {
    let (tx, rx) = mpsc::unbounded_channel();
    registry
        .register(Connection::new(id.to_string(), user_id.to_string(), tx))
        .await;
    rx
}

fn next_frame(rx: &mut UnboundedReceiver<Message>) -> ServerMessage {
    let msg = rx.try_recv().expect("expected a delivered frame");
    serde_json::from_str(msg.to_str().expect("text frame")).expect("valid server message")
}

#[tokio::test]
async fn test_relay_delivers_to_target_only() {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = SignalRelay::new(registry.clone());

    let mut rx_a = register(&registry, "a", "u1").await;
    let mut rx_b = register(&registry, "b", "u2").await;

    relay
        .relay("a", "b", SignalKind::Offer, serde_json::json!({"sdp": "v=0"}))
        .await
        .unwrap();

    match next_frame(&mut rx_b) {
        ServerMessage::Signal {
            from_connection_id,
            kind,
            data,
        } => {
            assert_eq!(from_connection_id, "a");
            assert_eq!(kind, SignalKind::Offer);
            assert_eq!(data["sdp"], "v=0");
        }
        other => panic!("unexpected frame: {:?}", other),
    }

    assert!(rx_a.try_recv().is_err(), "sender must not receive an echo");
}

#[tokio::test]
async fn test_relay_refuses_unregistered_sender() {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = SignalRelay::new(registry.clone());

    let mut rx_b = register(&registry, "b", "u2").await;

    let result = relay
        .relay("ghost", "b", SignalKind::Answer, serde_json::Value::Null)
        .await;

    assert!(matches!(result, Err(VoiceRelayError::Forbidden(_))));
    assert!(rx_b.try_recv().is_err(), "no delivery on rejected relay");
}

#[tokio::test]
async fn test_relay_after_sender_unregistered_fails() {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = SignalRelay::new(registry.clone());

    register(&registry, "a", "u1").await;
    let mut rx_b = register(&registry, "b", "u2").await;

    registry.unregister("a").await;

    let result = relay
        .relay("a", "b", SignalKind::IceCandidate, serde_json::Value::Null)
        .await;

    assert!(matches!(result, Err(VoiceRelayError::Forbidden(_))));
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn test_relay_to_dead_target_is_fire_and_forget() {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = SignalRelay::new(registry.clone());

    register(&registry, "a", "u1").await;

    // Target never existed; the sender observes no failure
    let result = relay
        .relay("a", "gone", SignalKind::Offer, serde_json::Value::Null)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_relay_passes_unknown_kind_through() {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = SignalRelay::new(registry.clone());

    register(&registry, "a", "u1").await;
    let mut rx_b = register(&registry, "b", "u2").await;

    relay
        .relay(
            "a",
            "b",
            SignalKind::from("renegotiate"),
            serde_json::Value::Null,
        )
        .await
        .unwrap();

    match next_frame(&mut rx_b) {
        ServerMessage::Signal { kind, .. } => {
            assert_eq!(kind.as_str(), "renegotiate");
        }
        other => panic!("unexpected frame: {:?}", other),
    }
}
