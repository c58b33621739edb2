use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, CreateGig, GigStatus, UpdateGig};

/// Upper bound on the browse listing, matching the public marketplace page.
const LIST_LIMIT: u64 = 50;

/// Insert a new gig. Gigs always start out `open` with no hiring bid.
pub async fn insert_gig(
    db: &DatabaseConnection,
    input: CreateGig,
    owner_id: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        owner_id: Set(owner_id),
        status: Set(GigStatus::Open),
        hiring_bid_id: Set(None),
        created_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Fetch open gigs for the browse page, newest first, optionally filtered by
/// a search term matched against title and description.
pub async fn get_open_gigs(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<gigs::Model>, DbErr> {
    let mut query = gigs::Entity::find().filter(gigs::Column::Status.eq(GigStatus::Open));

    if let Some(term) = search {
        query = query.filter(
            Condition::any()
                .add(gigs::Column::Title.contains(term))
                .add(gigs::Column::Description.contains(term)),
        );
    }

    query
        .order_by_desc(gigs::Column::CreatedAt)
        .limit(LIST_LIMIT)
        .all(db)
        .await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Fetch all gigs owned by a user, newest first.
pub async fn get_gigs_by_owner_id(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::OwnerId.eq(owner_id))
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// Update an existing gig's editable fields. Authorization and the
/// open-gigs-only rule are enforced by the handler.
pub async fn update_gig(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateGig,
) -> Result<gigs::Model, DbErr> {
    let gig = gigs::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Gig not found".to_string()))?;

    let mut active: gigs::ActiveModel = gig.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(budget) = input.budget {
        active.budget = Set(budget);
    }

    active.update(db).await
}

/// Delete a gig by ID. Its bids go with it via the FK cascade.
pub async fn delete_gig(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    gigs::Entity::delete_by_id(id).exec(db).await
}
