//! Reply planning for Friendbot.
//!
//! The planner guarantees every user submission gets exactly one reply:
//! canned text when no credential is configured, the remote model's text
//! otherwise, and a conversational fallback whenever the remote call fails.

mod planner;
mod session;

pub use planner::{PlannerConfig, Reply, ReplySource, ResponsePlanner};
pub use session::ChatSession;
