//! `fw-agent`: per-agent state for the `fieldwalk` framework.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`pose`]        | `AgentPose`: position + yaw                               |
//! | [`history`]     | `PositionHistory`: bounded ring + append-only log         |
//! | [`nav_state`]   | `AgentNavigationState`, `WanderMode`                      |
//! | [`locomotion`]  | `PathFollower`, `FollowStatus`                            |
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs`, `AgentConfig`     |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                 |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod builder;
pub mod error;
pub mod history;
pub mod locomotion;
pub mod nav_state;
pub mod pose;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use history::PositionHistory;
pub use locomotion::{FollowStatus, PathFollower};
pub use nav_state::{AgentNavigationState, WanderMode};
pub use pose::AgentPose;
pub use store::{AgentConfig, AgentRngs, AgentStore};
