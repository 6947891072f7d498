//! Record classification
//!
//! Rules are checked in a fixed order and the first match wins:
//! ```text
//! id starts with "recipe_"   -> Recipe
//! id starts with "plan_"     -> PlanEntry
//! id starts with "mealSel_"  -> MealSelection
//! truthy "ingredientKey"     -> GroceryItem
//! otherwise                  -> Unclassified
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mealplan_data::{new_record_id, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Recipe,
    PlanEntry,
    MealSelection,
    GroceryItem,
    Unclassified,
}

/// Field whose presence marks a grocery item
pub const GROCERY_MARKER: &str = "ingredientKey";

impl RecordKind {
    pub fn classify(record: &Record) -> Self {
        let id = record.id.as_str();

        if id.starts_with("recipe_") {
            RecordKind::Recipe
        } else if id.starts_with("plan_") {
            RecordKind::PlanEntry
        } else if id.starts_with("mealSel_") {
            RecordKind::MealSelection
        } else if record.get(GROCERY_MARKER).is_some_and(is_truthy) {
            RecordKind::GroceryItem
        } else {
            RecordKind::Unclassified
        }
    }

    /// Id prefix for kinds identified by prefix, without the trailing underscore
    pub fn id_prefix(&self) -> Option<&'static str> {
        match self {
            RecordKind::Recipe => Some("recipe"),
            RecordKind::PlanEntry => Some("plan"),
            RecordKind::MealSelection => Some("mealSel"),
            RecordKind::GroceryItem | RecordKind::Unclassified => None,
        }
    }

    /// Fresh id for a new record of a prefix-identified kind.
    ///
    /// Grocery items are recognized by `ingredientKey`, not by id, so they
    /// get `None` here like unclassified records.
    pub fn new_id(&self) -> Option<String> {
        self.id_prefix().map(new_record_id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Recipe => "recipe",
            RecordKind::PlanEntry => "plan_entry",
            RecordKind::MealSelection => "meal_selection",
            RecordKind::GroceryItem => "grocery_item",
            RecordKind::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Mirrors loose truthiness: empty strings, zero, false and null do not count
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
