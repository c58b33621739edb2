use serde::Serialize;
use uuid::Uuid;

/// Messages the server pushes to a connected client over WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The client's bid was chosen for a gig.
    Hired {
        bid_id: Uuid,
        gig_id: Uuid,
        gig_title: String,
        message: String,
    },
}
