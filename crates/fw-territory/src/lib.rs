//! `fw-territory`: social "claimed space" as a cost field.
//!
//! Every agent claims an asymmetric ellipse around itself, longer in front
//! than behind.  Each tick the [`TerritorialCostField`] is cleared to its base
//! cost and every claimed ellipse is painted on top.  When an agent queries
//! the field, the cost of its own ellipses is subtracted so it never avoids
//! its own territory.
//!
//! | Module        | Contents                                      |
//! |---------------|-----------------------------------------------|
//! | [`ellipse`]   | `TerritoryEllipse`, `TerritoryConfig`         |
//! | [`cost`]      | `TerritorialCostField`                        |
//! | [`error`]     | `TerritoryError`, `TerritoryResult<T>`        |

pub mod cost;
pub mod ellipse;
pub mod error;

#[cfg(test)]
mod tests;

pub use cost::TerritorialCostField;
pub use ellipse::{TerritoryConfig, TerritoryEllipse};
pub use error::{TerritoryError, TerritoryResult};
