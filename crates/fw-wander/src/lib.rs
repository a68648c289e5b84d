//! `fw-wander`: heuristic destination selection for wandering agents.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`config`]     | `WanderConfig`                                                |
//! | [`context`]    | `WanderContext<'a>`, `MapTerm<'a>`: read-only cycle inputs    |
//! | [`candidate`]  | `CandidatePoint`, `heading_alignment`, `novelty`, `select_best` |
//! | [`pushed`]     | `PushedPoints`, `PerceptionSource`, `PointsOfInterest`        |
//! | [`projection`] | `ProjectionCache`: path-length projection of pushed points    |
//! | [`selector`]   | `DestinationSelector`, `PickOutcome`, `needs_pick`, `score`   |
//! | [`error`]      | `WanderError`, `WanderResult<T>`                              |
//!
//! # State machine
//!
//! ```text
//!            dead end (best ≈ current position)
//!   Wandering ─────────────────────────────────▶ WalkingBack
//!       ▲                                             │
//!       └──────────── retreat target reached ─────────┘
//! ```
//!
//! `paused` is orthogonal to both modes and suspends re-picking.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on config and POI types. |

pub mod candidate;
pub mod config;
pub mod context;
pub mod error;
pub mod projection;
pub mod pushed;
pub mod selector;


pub use candidate::{CandidatePoint, heading_alignment, novelty, select_best};
pub use config::WanderConfig;
pub use context::{MapTerm, WanderContext};
pub use error::{WanderError, WanderResult};
pub use projection::ProjectionCache;
pub use pushed::{PerceptionSource, PointOfInterest, PointsOfInterest, PushedPoints};
pub use selector::{DestinationSelector, PickOutcome, SelectorStats, needs_pick, score};
