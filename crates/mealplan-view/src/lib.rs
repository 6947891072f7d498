//! Meal Planner View Layer
//!
//! Turns the flat record collection into typed slices and renders the
//! active screen. Record categories come from the id prefix (`recipe_`,
//! `plan_`, `mealSel_`) or from an `ingredientKey` field on grocery items.
//! Everything here is pure: no storage access.

mod kind;
mod partition;
mod render;
mod state;

pub use kind::RecordKind;
pub use partition::Partition;
pub use render::{escape_html, HtmlRenderer, Renderer, UiConfig};
pub use state::{week_start, AppState, View};
