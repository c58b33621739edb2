use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::notify::protocol::ServerMessage;

/// A handle to send messages to one connected WebSocket client.
#[derive(Debug)]
struct ClientHandle {
    conn_id: Uuid,
    sender: mpsc::UnboundedSender<ServerMessage>,
}

/// Manages all active notification connections, keyed by user.
///
/// A user may hold any number of simultaneous connections (multiple tabs,
/// multiple devices); a notification is broadcast to all of them. A user with
/// no connections simply receives nothing — delivery is best-effort.
pub struct NotificationServer {
    /// user_id -> live connection handles
    sessions: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
}

impl NotificationServer {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection for a user. Returns the connection id (used
    /// to deregister exactly this connection) and the receiver the WebSocket
    /// session should drain.
    pub async fn connect(&self, user_id: Uuid) -> (Uuid, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = Uuid::new_v4();

        let mut sessions = self.sessions.write().await;
        sessions.entry(user_id).or_default().push(ClientHandle {
            conn_id,
            sender: tx,
        });

        (conn_id, rx)
    }

    /// Remove a single connection for a user.
    pub async fn disconnect(&self, user_id: Uuid, conn_id: Uuid) {
        let mut sessions = self.sessions.write().await;

        if let Some(handles) = sessions.get_mut(&user_id) {
            handles.retain(|h| h.conn_id != conn_id);
            if handles.is_empty() {
                sessions.remove(&user_id);
            }
        }
    }

    /// Broadcast a message to every live connection the user holds.
    ///
    /// Fire-and-forget: an offline user, or a connection whose receiver has
    /// already been dropped, is not an error.
    pub async fn notify_user(&self, user_id: Uuid, message: ServerMessage) {
        let sessions = self.sessions.read().await;

        match sessions.get(&user_id) {
            Some(handles) => {
                for handle in handles {
                    // A failed send means the session task is gone; its
                    // disconnect() will clean the handle up.
                    let _ = handle.sender.send(message.clone());
                }
            }
            None => {
                tracing::debug!("No live connections for user {user_id}, notification dropped");
            }
        }
    }

    /// Check whether a user currently holds at least one connection.
    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&user_id)
    }
}

impl Default for NotificationServer {
    fn default() -> Self {
        Self::new()
    }
}
