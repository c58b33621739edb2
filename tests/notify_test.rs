//! Tests for the notification fan-out registry.
//!
//! The registry is purely in-memory, so delivery semantics — multi-connection
//! broadcast, silent drops for offline users, per-connection teardown — are
//! all checkable without a server.

use tokio::sync::mpsc::error::TryRecvError;
use uuid::Uuid;

use gigbid_backend::notify::NotificationServer;
use gigbid_backend::notify::protocol::ServerMessage;

fn hired_message(gig_title: &str) -> ServerMessage {
    ServerMessage::Hired {
        bid_id: Uuid::new_v4(),
        gig_id: Uuid::new_v4(),
        gig_title: gig_title.to_string(),
        message: format!("Congratulations! You've been hired for {gig_title}"),
    }
}

#[tokio::test]
async fn broadcast_reaches_every_connection_of_the_user() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    let (_conn_a, mut rx_a) = server.connect(user).await;
    let (_conn_b, mut rx_b) = server.connect(user).await;

    server.notify_user(user, hired_message("Logo design")).await;

    for rx in [&mut rx_a, &mut rx_b] {
        let ServerMessage::Hired { gig_title, message, .. } =
            rx.try_recv().expect("connection should have received the event");
        assert_eq!(gig_title, "Logo design");
        assert!(message.contains("Logo design"));
    }
}

#[tokio::test]
async fn offline_user_is_silently_skipped() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    assert!(!server.is_online(user).await);

    // Nothing to deliver to; must be a no-op rather than an error.
    server.notify_user(user, hired_message("Data scraping")).await;
}

#[tokio::test]
async fn other_users_do_not_receive_the_event() {
    let server = NotificationServer::new();
    let winner = Uuid::new_v4();
    let bystander = Uuid::new_v4();

    let (_conn_w, mut rx_w) = server.connect(winner).await;
    let (_conn_b, mut rx_b) = server.connect(bystander).await;

    server.notify_user(winner, hired_message("App icon")).await;

    assert!(rx_w.try_recv().is_ok());
    assert_eq!(rx_b.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn disconnect_removes_only_that_connection() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    let (conn_a, mut rx_a) = server.connect(user).await;
    let (_conn_b, mut rx_b) = server.connect(user).await;

    server.disconnect(user, conn_a).await;
    assert!(server.is_online(user).await);

    server.notify_user(user, hired_message("Copy editing")).await;

    // The surviving connection gets the event; the closed one's sender is
    // gone, so its receiver reports disconnection rather than a message.
    assert!(rx_b.try_recv().is_ok());
    assert_eq!(rx_a.try_recv().unwrap_err(), TryRecvError::Disconnected);
}

#[tokio::test]
async fn last_disconnect_takes_the_user_offline() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    let (conn_a, _rx_a) = server.connect(user).await;
    let (conn_b, _rx_b) = server.connect(user).await;

    server.disconnect(user, conn_a).await;
    server.disconnect(user, conn_b).await;

    assert!(!server.is_online(user).await);
}

#[tokio::test]
async fn dropped_receiver_never_surfaces_an_error() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    let (_conn, rx) = server.connect(user).await;
    drop(rx);

    // The session died without deregistering yet; the send quietly fails.
    server.notify_user(user, hired_message("Video edit")).await;
}
