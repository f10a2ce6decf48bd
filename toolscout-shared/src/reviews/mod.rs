//! Review lifecycle
//!
//! - [`moderation`]: the `pending → approved | rejected` state machine and who may drive it
//! - [`aggregator`]: recomputes a tool's `avg_rating`/`review_count` from its approved reviews
//! - [`service`]: create, get, list and moderate reviews
//!
//! The aggregate invariant holds after every moderation call returns: a
//! transition into `approved` recomputes the tool synchronously, and no other
//! transition can change the approved set.

pub mod aggregator;
pub mod moderation;
pub mod service;

pub use aggregator::RatingAggregator;
pub use moderation::ModerationDecision;
pub use service::{NameJoin, ReviewService};
