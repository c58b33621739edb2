use sea_orm::*;
use uuid::Uuid;

use crate::hiring::engine::{HireRejection, decide_hire};
use crate::models::bids::{self, BidStatus};
use crate::models::gigs::{self, GigStatus};

/// Everything that can come out of a hire attempt short of success.
#[derive(Debug, thiserror::Error)]
pub enum HireError {
    /// A precondition failed. No writes happened; retrying the same request
    /// will fail the same way (or resolve to `AlreadyAssigned` if someone
    /// else committed first).
    #[error(transparent)]
    Rejected(#[from] HireRejection),
    /// Infrastructure failure during the atomic apply. The transaction was
    /// rolled back; the caller may safely retry.
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// The state produced by a committed hire, for the response body and the
/// winner notification.
#[derive(Debug, Clone)]
pub struct HireCommitted {
    pub gig: gigs::Model,
    pub hired_bid: bids::Model,
    pub rejected_bid_ids: Vec<Uuid>,
}

/// Execute the hire transition for `gig_id`/`bid_id` on behalf of
/// `requester_id`.
///
/// The gig row is locked `FOR UPDATE` for the whole read-decide-write span,
/// so two hire attempts on the same gig serialize at the database no matter
/// how many server processes are running: the first to commit wins, the rest
/// re-read the assigned gig and are rejected. Bid submissions take a shared
/// lock on the same row and therefore also serialize against this section.
/// Unrelated gigs never contend.
pub async fn execute_hire(
    db: &DatabaseConnection,
    gig_id: Uuid,
    bid_id: Uuid,
    requester_id: Uuid,
) -> Result<HireCommitted, HireError> {
    let txn = db.begin().await?;

    let gig = gigs::Entity::find_by_id(gig_id)
        .lock_exclusive()
        .one(&txn)
        .await?;

    // Gig and bids must be read inside the critical section; anything loaded
    // before the lock could have been invalidated by a concurrent commit.
    let gig_bids = bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .all(&txn)
        .await?;

    let plan = match decide_hire(gig.as_ref(), bid_id, &gig_bids, requester_id) {
        Ok(plan) => plan,
        Err(rejection) => {
            txn.rollback().await?;
            return Err(rejection.into());
        }
    };

    // Apply the full write-set inside the same transaction: the chosen bid,
    // every still-pending competitor, then the gig itself.
    let hired = bids::ActiveModel {
        id: Unchanged(plan.hired_bid_id),
        status: Set(BidStatus::Hired),
        ..Default::default()
    };
    let hired_bid = hired.update(&txn).await?;

    for rejected_id in &plan.rejected_bid_ids {
        let rejected = bids::ActiveModel {
            id: Unchanged(*rejected_id),
            status: Set(BidStatus::Rejected),
            ..Default::default()
        };
        rejected.update(&txn).await?;
    }

    let assigned = gigs::ActiveModel {
        id: Unchanged(plan.gig_id),
        status: Set(GigStatus::Assigned),
        hiring_bid_id: Set(Some(plan.hired_bid_id)),
        ..Default::default()
    };
    let gig = assigned.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Gig {gig_id} assigned to bid {bid_id}, {} other bid(s) rejected",
        plan.rejected_bid_ids.len()
    );

    Ok(HireCommitted {
        gig,
        hired_bid,
        rejected_bid_ids: plan.rejected_bid_ids,
    })
}
