//! The hire transition: atomically move a gig from "open, multiple pending
//! bids" to "assigned, one hired bid, all others rejected".
//!
//! Split in two so the decision logic stays testable without a database:
//! [`engine`] is a pure function from observed state to a planned write-set,
//! and [`coordinator`] drives it inside a per-gig critical section and applies
//! the write-set as a single transaction.

pub mod coordinator;
pub mod engine;

pub use coordinator::{HireCommitted, HireError, execute_hire};
pub use engine::{HirePlan, HireRejection, decide_hire};
