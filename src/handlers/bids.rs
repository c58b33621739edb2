use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::bids::{self as bid_db, SubmitBidError};
use crate::db::gigs as gig_db;
use crate::hiring::{self, HireError, HireRejection};
use crate::models::bids::SubmitBid;
use crate::notify::NotificationServer;
use crate::notify::protocol::ServerMessage;

const MAX_MESSAGE_LEN: usize = 500;

/// POST /api/bids — a freelancer submits a bid on an open gig.
///
/// The insert is gated on the gig still being open at the moment it lands
/// (see `db::bids::insert_bid`), so a bid racing a hire on the same gig is
/// either resolved by that hire or refused here.
pub async fn submit_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<SubmitBid>,
) -> impl Responder {
    let input = body.into_inner();

    if input.message.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Please provide a message with your bid",
        }));
    }
    if input.message.len() > MAX_MESSAGE_LEN {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Message cannot be more than {MAX_MESSAGE_LEN} characters"),
        }));
    }
    if input.price <= 0.0 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Price must be positive",
        }));
    }

    match bid_db::insert_bid(db.get_ref(), input, user.0.id).await {
        Ok(bid) => HttpResponse::Created().json(serde_json::json!({
            "message": "Bid submitted successfully",
            "bid": bid,
        })),
        Err(SubmitBidError::GigNotFound) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Gig not found",
        })),
        Err(e @ SubmitBidError::GigAlreadyAssigned)
        | Err(e @ SubmitBidError::OwnGig)
        | Err(e @ SubmitBidError::DuplicateBid) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string(),
            }))
        }
        Err(SubmitBidError::Db(e)) => HttpResponse::InternalServerError().json(
            serde_json::json!({
                "error": format!("Database error: {e}"),
            }),
        ),
    }
}

/// GET /api/bids/gig/{gig_id} — all bids on a gig, owner only, newest first.
pub async fn get_bids_for_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let gig_id = path.into_inner();

    let gig = match gig_db::get_gig_by_id(db.get_ref(), gig_id).await {
        Ok(Some(gig)) => gig,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Gig {gig_id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    if gig.owner_id != user.0.id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Not authorized to view these bids",
        }));
    }

    match bid_db::get_bids_for_gig(db.get_ref(), gig_id).await {
        Ok(bids) => HttpResponse::Ok().json(serde_json::json!({
            "gig": {
                "id": gig.id,
                "title": gig.title,
                "budget": gig.budget,
                "status": gig.status,
            },
            "bids": bids,
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/bids/mine — the caller's bids across all gigs, newest first.
pub async fn get_my_bids(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match bid_db::get_bids_by_freelancer(db.get_ref(), user.0.id).await {
        Ok(bids) => HttpResponse::Ok().json(serde_json::json!({ "bids": bids })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/gigs/{gig_id}/bids/{bid_id}/hire — the hire transition.
///
/// Delegates to the hiring coordinator for the atomic part, then — strictly
/// after commit — dispatches the winner notification on a detached task and
/// drops the gig's cache entries. Neither of those can fail the request: the
/// hire is already durable.
pub async fn hire_bidder(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    notifier: web::Data<Arc<NotificationServer>>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (gig_id, bid_id) = path.into_inner();

    let committed = match hiring::execute_hire(db.get_ref(), gig_id, bid_id, user.0.id).await {
        Ok(committed) => committed,
        Err(HireError::Rejected(rejection)) => {
            let mut status = match rejection {
                HireRejection::GigNotFound | HireRejection::BidNotFound => {
                    HttpResponse::NotFound()
                }
                HireRejection::Unauthorized => HttpResponse::Forbidden(),
                HireRejection::AlreadyAssigned | HireRejection::BidUnavailable => {
                    HttpResponse::BadRequest()
                }
            };
            return status.json(serde_json::json!({
                "error": rejection.to_string(),
            }));
        }
        Err(HireError::Db(e)) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hire: {e}"),
            }));
        }
    };

    // Detached from this request's lifetime: a client that disconnects right
    // after commit must not cancel the winner's notification.
    let notifier = notifier.get_ref().clone();
    let freelancer_id = committed.hired_bid.freelancer_id;
    let notification = ServerMessage::Hired {
        bid_id: committed.hired_bid.id,
        gig_id: committed.gig.id,
        gig_title: committed.gig.title.clone(),
        message: format!(
            "Congratulations! You've been hired for {}",
            committed.gig.title
        ),
    };
    actix_web::rt::spawn(async move {
        notifier.notify_user(freelancer_id, notification).await;
    });

    if let Err(e) = cache.delete(&keys::gig(&gig_id.to_string())).await {
        tracing::warn!("Failed to invalidate gig {gig_id}: {e}");
    }
    if let Err(e) = cache.delete_pattern(keys::GIG_LIST_PATTERN).await {
        tracing::warn!("Failed to invalidate gig listings: {e}");
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Freelancer hired successfully!",
        "bid": committed.hired_bid,
        "gig": committed.gig,
    }))
}
