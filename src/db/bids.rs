use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, BidStatus, SubmitBid};
use crate::models::gigs::{self, GigStatus};

/// Why a bid submission was refused.
#[derive(Debug, thiserror::Error)]
pub enum SubmitBidError {
    #[error("gig not found")]
    GigNotFound,
    #[error("this gig has already been assigned")]
    GigAlreadyAssigned,
    #[error("you cannot bid on your own gig")]
    OwnGig,
    #[error("you have already bid on this gig")]
    DuplicateBid,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Insert a new bid, gated on the gig still being open at the moment of the
/// insert.
///
/// The whole check-and-insert runs in one transaction holding a shared lock
/// on the gig row, so it serializes against a concurrent hire (which takes
/// the exclusive lock): either the bid lands while the gig is still open, or
/// the submission observes `assigned` and is refused. The `(gig_id,
/// freelancer_id)` unique index backstops the duplicate check.
pub async fn insert_bid(
    db: &DatabaseConnection,
    input: SubmitBid,
    freelancer_id: Uuid,
) -> Result<bids::Model, SubmitBidError> {
    let txn = db.begin().await?;

    let gig = gigs::Entity::find_by_id(input.gig_id)
        .lock_shared()
        .one(&txn)
        .await?
        .ok_or(SubmitBidError::GigNotFound)?;

    if gig.status != GigStatus::Open {
        return Err(SubmitBidError::GigAlreadyAssigned);
    }

    if gig.owner_id == freelancer_id {
        return Err(SubmitBidError::OwnGig);
    }

    let existing = bids::Entity::find()
        .filter(bids::Column::GigId.eq(input.gig_id))
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .one(&txn)
        .await?;

    if existing.is_some() {
        return Err(SubmitBidError::DuplicateBid);
    }

    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(input.gig_id),
        freelancer_id: Set(freelancer_id),
        message: Set(input.message),
        price: Set(input.price),
        status: Set(BidStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    let inserted = match new_bid.insert(&txn).await {
        Ok(bid) => bid,
        // Two submissions from the same freelancer can race past the
        // existence check; the unique index catches the loser.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(SubmitBidError::DuplicateBid);
        }
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;
    Ok(inserted)
}

/// Fetch all bids for a gig, newest first.
pub async fn get_bids_for_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch all bids placed by a freelancer, newest first.
pub async fn get_bids_by_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Count the bids on a gig.
pub async fn count_bids_for_gig(db: &DatabaseConnection, gig_id: Uuid) -> Result<u64, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .count(db)
        .await
}
