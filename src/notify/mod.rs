//! Real-time notification fanout over WebSockets.
//!
//! An in-memory registry maps a user to their live connections; publishing is
//! broadcast-on-send with no persistence, no retry, and no delivery receipt.
//! The registry is created once at process start and injected as app data —
//! its lifecycle is independent of any request or transaction.

pub mod protocol;
pub mod server;
pub mod session;

pub use server::NotificationServer;
