use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::middleware::JwtSecret;
use crate::notify::protocol::ServerMessage;
use crate::notify::server::NotificationServer;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/notifications/ws?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket and registers it for the
/// authenticated user. Authenticates via query param token (browsers can't
/// send Authorization headers during the WebSocket handshake).
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    secret: web::Data<JwtSecret>,
    notifier: web::Data<Arc<NotificationServer>>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = jwt::validate_token(&query.token, &secret.get_ref().0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (conn_id, rx) = notifier.connect(user_id).await;
    tracing::debug!("User {user_id} connected to notifications ({conn_id})");

    let notifier = notifier.get_ref().clone();
    actix_web::rt::spawn(handle_ws_session(
        session, msg_stream, rx, user_id, conn_id, notifier,
    ));

    Ok(response)
}

/// Drives one notification connection: pushes outgoing messages to the
/// client, answers pings, and deregisters on disconnect. Incoming text is
/// ignored — this channel is push-only.
async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    user_id: Uuid,
    conn_id: Uuid,
    notifier: Arc<NotificationServer>,
) {
    loop {
        tokio::select! {
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            Some(server_msg) = rx.recv() => {
                let json = match serde_json::to_string(&server_msg) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    notifier.disconnect(user_id, conn_id).await;
    let _ = session.close(None).await;
    tracing::debug!("User {user_id} disconnected from notifications ({conn_id})");
}
