use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::models::gigs::{CreateGig, GigListQuery, GigStatus, GigWithBidCount, UpdateGig};

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// GET /api/gigs?search= — browse open gigs, newest first.
///
/// Listings are cached per search term; mutations invalidate the whole
/// listing namespace.
pub async fn get_gigs(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    query: web::Query<GigListQuery>,
) -> impl Responder {
    let search = query.search.as_deref().unwrap_or("").trim().to_string();
    let cache_key = keys::gig_list(&search);

    if let Ok(Some(cached)) = cache
        .get::<Vec<crate::models::gigs::Model>>(&cache_key)
        .await
    {
        let total = cached.len();
        return HttpResponse::Ok().json(serde_json::json!({
            "gigs": cached,
            "total": total,
        }));
    }

    let search_term = if search.is_empty() {
        None
    } else {
        Some(search.as_str())
    };

    match gig_db::get_open_gigs(db.get_ref(), search_term).await {
        Ok(gigs) => {
            if let Err(e) = cache
                .set(&cache_key, &gigs, Some(cache_config.gig_list_ttl.as_secs()))
                .await
            {
                tracing::warn!("Failed to cache gig listing: {e}");
            }
            let total = gigs.len();
            HttpResponse::Ok().json(serde_json::json!({
                "gigs": gigs,
                "total": total,
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch gigs: {e}"),
        })),
    }
}

/// GET /api/gigs/{id} — gig detail with its bid count.
pub async fn get_gig(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    let cache_key = keys::gig(&id.to_string());

    if let Ok(Some(cached)) = cache.get::<GigWithBidCount>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    let gig = match gig_db::get_gig_by_id(db.get_ref(), id).await {
        Ok(Some(gig)) => gig,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Gig {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let bid_count = match bid_db::count_bids_for_gig(db.get_ref(), id).await {
        Ok(count) => count,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let detail = GigWithBidCount { gig, bid_count };

    if let Err(e) = cache
        .set(&cache_key, &detail, Some(cache_config.gig_ttl.as_secs()))
        .await
    {
        tracing::warn!("Failed to cache gig {id}: {e}");
    }

    HttpResponse::Ok().json(detail)
}

/// POST /api/gigs — post a new gig.
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateGig>,
) -> impl Responder {
    let input = body.into_inner();

    if let Some(error) = validate_gig_fields(&input.title, &input.description, input.budget) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": error }));
    }

    match gig_db::insert_gig(db.get_ref(), input, user.0.id).await {
        Ok(gig) => {
            invalidate_listings(&cache).await;
            HttpResponse::Created().json(serde_json::json!({
                "message": "Gig created successfully",
                "gig": gig,
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create gig: {e}"),
        })),
    }
}

/// GET /api/gigs/mine — the caller's own gigs with per-gig bid counts.
pub async fn get_my_gigs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    let gigs = match gig_db::get_gigs_by_owner_id(db.get_ref(), user.0.id).await {
        Ok(gigs) => gigs,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let mut with_counts = Vec::with_capacity(gigs.len());
    for gig in gigs {
        match bid_db::count_bids_for_gig(db.get_ref(), gig.id).await {
            Ok(bid_count) => with_counts.push(GigWithBidCount { gig, bid_count }),
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Database error: {e}"),
                }));
            }
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "gigs": with_counts }))
}

/// PUT /api/gigs/{id} — owner edits an open gig.
pub async fn update_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateGig>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    let gig = match gig_db::get_gig_by_id(db.get_ref(), id).await {
        Ok(Some(gig)) => gig,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Gig {id} not found"),
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
            "error": "Not authorized to update this gig",
        }));
    }

    if gig.status != GigStatus::Open {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Cannot update an assigned gig",
        }));
    }

    if let Some(title) = &input.title {
        if title.trim().is_empty() || title.len() > MAX_TITLE_LEN {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Title must be 1-{MAX_TITLE_LEN} characters"),
            }));
        }
    }
    if let Some(description) = &input.description {
        if description.trim().is_empty() || description.len() > MAX_DESCRIPTION_LEN {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Description must be 1-{MAX_DESCRIPTION_LEN} characters"),
            }));
        }
    }
    if let Some(budget) = input.budget {
        if budget <= 0.0 {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Budget must be positive",
            }));
        }
    }

    match gig_db::update_gig(db.get_ref(), id, input).await {
        Ok(updated) => {
            invalidate_gig(&cache, id).await;
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Gig updated successfully",
                "gig": updated,
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update gig: {e}"),
        })),
    }
}

/// DELETE /api/gigs/{id} — owner deletes an open gig; its bids go with it.
pub async fn delete_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let gig = match gig_db::get_gig_by_id(db.get_ref(), id).await {
        Ok(Some(gig)) => gig,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Gig {id} not found"),
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
            "error": "Not authorized to delete this gig",
        }));
    }

    if gig.status != GigStatus::Open {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Cannot delete an assigned gig",
        }));
    }

    match gig_db::delete_gig(db.get_ref(), id).await {
        Ok(_) => {
            invalidate_gig(&cache, id).await;
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Gig deleted successfully",
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete gig: {e}"),
        })),
    }
}

/// Shared validation for gig creation.
fn validate_gig_fields(title: &str, description: &str, budget: f64) -> Option<String> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Some("Please fill in all required fields".to_string());
    }
    if title.len() > MAX_TITLE_LEN {
        return Some(format!("Title cannot be more than {MAX_TITLE_LEN} characters"));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Some(format!(
            "Description cannot be more than {MAX_DESCRIPTION_LEN} characters"
        ));
    }
    if budget <= 0.0 {
        return Some("Budget must be positive".to_string());
    }
    None
}

/// Drop every cached browse listing. Best-effort; a stale read is worth less
/// than a failed write.
async fn invalidate_listings(cache: &CacheData) {
    if let Err(e) = cache.delete_pattern(keys::GIG_LIST_PATTERN).await {
        tracing::warn!("Failed to invalidate gig listings: {e}");
    }
}

/// Drop a gig's cached detail and every listing that may contain it.
async fn invalidate_gig(cache: &CacheData, id: Uuid) {
    if let Err(e) = cache.delete(&keys::gig(&id.to_string())).await {
        tracing::warn!("Failed to invalidate gig {id}: {e}");
    }
    invalidate_listings(cache).await;
}
