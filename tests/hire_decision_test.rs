//! Unit tests for the hire decision engine.
//!
//! The engine is pure — given a gig, its bids, and a requester it either
//! produces the planned write-set or a typed rejection — so everything here
//! runs without a database. The coordinator applies whatever plan comes out
//! of it atomically; these tests pin down what that plan is.

use chrono::Utc;
use uuid::Uuid;

use gigbid_backend::hiring::{HirePlan, HireRejection, decide_hire};
use gigbid_backend::models::bids::{self, BidStatus};
use gigbid_backend::models::gigs::{self, GigStatus};

fn open_gig(owner_id: Uuid) -> gigs::Model {
    gigs::Model {
        id: Uuid::new_v4(),
        title: "Build a landing page".to_string(),
        description: "Single-page site with a contact form".to_string(),
        budget: 500.0,
        owner_id,
        status: GigStatus::Open,
        hiring_bid_id: None,
        created_at: Utc::now(),
    }
}

fn pending_bid(gig_id: Uuid, freelancer_id: Uuid) -> bids::Model {
    bids::Model {
        id: Uuid::new_v4(),
        gig_id,
        freelancer_id,
        message: "I can have this done within a week".to_string(),
        price: 450.0,
        status: BidStatus::Pending,
        created_at: Utc::now(),
    }
}

#[test]
fn missing_gig_is_rejected_first() {
    let requester = Uuid::new_v4();
    let result = decide_hire(None, Uuid::new_v4(), &[], requester);
    assert_eq!(result, Err(HireRejection::GigNotFound));
}

#[test]
fn unknown_bid_is_rejected() {
    let owner = Uuid::new_v4();
    let gig = open_gig(owner);
    let bid = pending_bid(gig.id, Uuid::new_v4());

    let result = decide_hire(Some(&gig), Uuid::new_v4(), &[bid], owner);
    assert_eq!(result, Err(HireRejection::BidNotFound));
}

#[test]
fn bid_referencing_another_gig_is_rejected() {
    let owner = Uuid::new_v4();
    let gig = open_gig(owner);
    // A bid whose id we know but which belongs to a different gig.
    let foreign_bid = pending_bid(Uuid::new_v4(), Uuid::new_v4());

    let result = decide_hire(Some(&gig), foreign_bid.id, &[foreign_bid], owner);
    assert_eq!(result, Err(HireRejection::BidNotFound));
}

#[test]
fn non_owner_cannot_hire() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let gig = open_gig(owner);
    let bid = pending_bid(gig.id, Uuid::new_v4());
    let bid_id = bid.id;

    // The bid is perfectly valid; authorization still has to fail.
    let result = decide_hire(Some(&gig), bid_id, &[bid], stranger);
    assert_eq!(result, Err(HireRejection::Unauthorized));
}

#[test]
fn assigned_gig_rejects_any_further_hire() {
    let owner = Uuid::new_v4();
    let mut gig = open_gig(owner);
    let mut hired = pending_bid(gig.id, Uuid::new_v4());
    hired.status = BidStatus::Hired;
    let mut rejected = pending_bid(gig.id, Uuid::new_v4());
    rejected.status = BidStatus::Rejected;
    gig.status = GigStatus::Assigned;
    gig.hiring_bid_id = Some(hired.id);

    // Re-targeting the already-hired bid or the rejected one both stop at
    // the gig-status check: once assigned, always `AlreadyAssigned`.
    let hired_id = hired.id;
    let rejected_id = rejected.id;
    let all = vec![hired, rejected];

    assert_eq!(
        decide_hire(Some(&gig), hired_id, &all, owner),
        Err(HireRejection::AlreadyAssigned)
    );
    assert_eq!(
        decide_hire(Some(&gig), rejected_id, &all, owner),
        Err(HireRejection::AlreadyAssigned)
    );
}

#[test]
fn resolved_bid_on_an_open_gig_is_unavailable() {
    let owner = Uuid::new_v4();
    let gig = open_gig(owner);
    let mut bid = pending_bid(gig.id, Uuid::new_v4());
    bid.status = BidStatus::Rejected;
    let bid_id = bid.id;

    let result = decide_hire(Some(&gig), bid_id, &[bid], owner);
    assert_eq!(result, Err(HireRejection::BidUnavailable));
}

#[test]
fn plan_rejects_every_pending_competitor_and_nothing_else() {
    let owner = Uuid::new_v4();
    let gig = open_gig(owner);

    let target = pending_bid(gig.id, Uuid::new_v4());
    let competitor_a = pending_bid(gig.id, Uuid::new_v4());
    let competitor_b = pending_bid(gig.id, Uuid::new_v4());
    // A bid already terminally resolved must be left untouched even though
    // this state cannot arise while the invariants hold.
    let mut stale = pending_bid(gig.id, Uuid::new_v4());
    stale.status = BidStatus::Rejected;

    let target_id = target.id;
    let a_id = competitor_a.id;
    let b_id = competitor_b.id;
    let stale_id = stale.id;
    let all = vec![target, competitor_a, competitor_b, stale];

    let plan = decide_hire(Some(&gig), target_id, &all, owner).expect("hire should be legal");

    assert_eq!(plan.gig_id, gig.id);
    assert_eq!(plan.hired_bid_id, target_id);
    assert_eq!(plan.rejected_bid_ids.len(), 2);
    assert!(plan.rejected_bid_ids.contains(&a_id));
    assert!(plan.rejected_bid_ids.contains(&b_id));
    assert!(!plan.rejected_bid_ids.contains(&stale_id));
    assert!(!plan.rejected_bid_ids.contains(&target_id));
}

#[test]
fn sole_bid_produces_an_empty_rejection_set() {
    let owner = Uuid::new_v4();
    let gig = open_gig(owner);
    let bid = pending_bid(gig.id, Uuid::new_v4());
    let bid_id = bid.id;

    let plan = decide_hire(Some(&gig), bid_id, &[bid], owner).expect("hire should be legal");
    assert_eq!(
        plan,
        HirePlan {
            gig_id: gig.id,
            hired_bid_id: bid_id,
            rejected_bid_ids: vec![],
        }
    );
}

/// The worked end-to-end scenario: owner U1 hires B1 out of {B1, B2}; the
/// plan resolves B2; replaying a hire against the committed state is refused
/// with zero further writes.
#[test]
fn hire_then_rehire_scenario() {
    let u1 = Uuid::new_v4();
    let f1 = Uuid::new_v4();
    let f2 = Uuid::new_v4();

    let mut gig = open_gig(u1);
    let b1 = pending_bid(gig.id, f1);
    let b2 = pending_bid(gig.id, f2);
    let b1_id = b1.id;
    let b2_id = b2.id;
    let mut all = vec![b1, b2];

    let plan = decide_hire(Some(&gig), b1_id, &all, u1).expect("first hire should succeed");
    assert_eq!(plan.hired_bid_id, b1_id);
    assert_eq!(plan.rejected_bid_ids, vec![b2_id]);

    // Apply the plan the way the coordinator would.
    gig.status = GigStatus::Assigned;
    gig.hiring_bid_id = Some(plan.hired_bid_id);
    all[0].status = BidStatus::Hired;
    all[1].status = BidStatus::Rejected;

    // The gig is terminal: a second hire attempt on the other bid fails
    // before any write-set is computed.
    let result = decide_hire(Some(&gig), b2_id, &all, u1);
    assert_eq!(result, Err(HireRejection::AlreadyAssigned));
}
