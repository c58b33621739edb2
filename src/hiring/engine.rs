use uuid::Uuid;

use crate::models::bids::{self, BidStatus};
use crate::models::gigs::{self, GigStatus};

/// Why a hire attempt was refused. Each precondition maps to exactly one
/// variant so callers can distinguish them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HireRejection {
    #[error("gig not found")]
    GigNotFound,
    #[error("bid not found")]
    BidNotFound,
    #[error("not authorized to hire for this gig")]
    Unauthorized,
    #[error("this gig has already been assigned")]
    AlreadyAssigned,
    #[error("this bid is no longer available")]
    BidUnavailable,
}

/// The planned write-set for a legal hire. Data only — nothing has been
/// written when this is returned; the coordinator applies all of it in one
/// transaction or none of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HirePlan {
    pub gig_id: Uuid,
    /// Becomes `hired`.
    pub hired_bid_id: Uuid,
    /// Every other bid on the gig that is still `pending`; each becomes
    /// `rejected`. Bids already terminally resolved are left untouched.
    pub rejected_bid_ids: Vec<Uuid>,
}

/// Decide whether `requester_id` may hire `target_bid_id` on `gig`, given
/// every bid currently recorded for that gig.
///
/// Pure: no I/O, no partial application. Preconditions are checked in a fixed
/// order and the first failure wins, so a request that is simultaneously
/// unauthorized and late still reports `Unauthorized`.
pub fn decide_hire(
    gig: Option<&gigs::Model>,
    target_bid_id: Uuid,
    gig_bids: &[bids::Model],
    requester_id: Uuid,
) -> Result<HirePlan, HireRejection> {
    let gig = gig.ok_or(HireRejection::GigNotFound)?;

    // A bid that exists but references a different gig is indistinguishable
    // from a missing one here: `gig_bids` holds only this gig's bids.
    let target = gig_bids
        .iter()
        .find(|b| b.id == target_bid_id && b.gig_id == gig.id)
        .ok_or(HireRejection::BidNotFound)?;

    if gig.owner_id != requester_id {
        return Err(HireRejection::Unauthorized);
    }

    if gig.status != GigStatus::Open {
        return Err(HireRejection::AlreadyAssigned);
    }

    if target.status != BidStatus::Pending {
        return Err(HireRejection::BidUnavailable);
    }

    let rejected_bid_ids = gig_bids
        .iter()
        .filter(|b| b.id != target.id && b.status == BidStatus::Pending)
        .map(|b| b.id)
        .collect();

    Ok(HirePlan {
        gig_id: gig.id,
        hired_bid_id: target.id,
        rejected_bid_ids,
    })
}
