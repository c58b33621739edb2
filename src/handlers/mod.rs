pub mod auth;
pub mod bids;
pub mod gigs;
pub mod users;

use actix_web::{HttpResponse, Responder, web};

use crate::notify;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Health check (public) ──
    cfg.route("/health", web::get().to(health));

    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── User routes (all protected — require valid JWT) ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(web::resource("/users/{id}").route(web::get().to(users::get_user)));

    // ── Gig routes (all protected — require valid JWT) ──
    // "/mine" must be registered before "/{id}".
    cfg.service(
        web::scope("/gigs")
            .route("", web::get().to(gigs::get_gigs))
            .route("", web::post().to(gigs::create_gig))
            .route("/mine", web::get().to(gigs::get_my_gigs))
            .route("/{id}", web::get().to(gigs::get_gig))
            .route("/{id}", web::put().to(gigs::update_gig))
            .route("/{id}", web::delete().to(gigs::delete_gig))
            .route(
                "/{gig_id}/bids/{bid_id}/hire",
                web::post().to(bids::hire_bidder),
            ),
    );

    // ── Bid routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/bids")
            .route("", web::post().to(bids::submit_bid))
            .route("/mine", web::get().to(bids::get_my_bids))
            .route("/gig/{gig_id}", web::get().to(bids::get_bids_for_gig)),
    );

    // ── Notification WebSocket (authenticates via query param token) ──
    cfg.service(
        web::resource("/notifications/ws").route(web::get().to(notify::session::ws_connect)),
    );
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "OK" }))
}
