//! Application state container
//!
//! Holds the derived record slices together with the UI state that lives
//! independently of the store (active view, filters, selection, week).

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use mealplan_data::Record;

use crate::partition::Partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    Recipes,
    WeeklyPlan,
    GroceryList,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Recipes => "recipes",
            View::WeeklyPlan => "weekly-plan",
            View::GroceryList => "grocery-list",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(View::Home),
            "recipes" => Ok(View::Recipes),
            "weekly-plan" => Ok(View::WeeklyPlan),
            "grocery-list" => Ok(View::GroceryList),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = Duration::days(date.weekday().num_days_from_monday() as i64);
    date.checked_sub_signed(offset).unwrap_or(date)
}

pub const DEFAULT_CATEGORY: &str = "Breakfast";

#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    /// Slices derived from the latest collection
    pub partition: Partition,
    pub view: View,
    /// `None` shows every category
    pub selected_category: Option<String>,
    pub search_term: String,
    pub filter_favorites: bool,
    pub week_start: NaiveDate,
    pub selected_recipe_id: Option<String>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            partition: Partition::default(),
            view: View::Home,
            selected_category: Some(DEFAULT_CATEGORY.to_string()),
            search_term: String::new(),
            filter_favorites: false,
            week_start: week_start(today),
            selected_recipe_id: None,
        }
    }

    /// Re-derive every slice from the full collection.
    /// UI state is left as it is.
    pub fn apply(&mut self, records: &[Record]) {
        self.partition = Partition::derive(records);

        // A deleted recipe can no longer be selected
        let stale = self
            .selected_recipe_id
            .as_deref()
            .is_some_and(|id| self.recipe_by_id(id).is_none());
        if stale {
            self.selected_recipe_id = None;
        }
    }

    pub fn recipes(&self) -> &[Record] {
        &self.partition.recipes
    }

    pub fn plan_entries(&self) -> &[Record] {
        &self.partition.plan_entries
    }

    pub fn meal_selections(&self) -> &[Record] {
        &self.partition.meal_selections
    }

    pub fn grocery_items(&self) -> &[Record] {
        &self.partition.grocery_items
    }

    pub fn recipe_by_id(&self, id: &str) -> Option<&Record> {
        self.partition.recipes.iter().find(|r| r.id == id)
    }

    pub fn selected_recipe(&self) -> Option<&Record> {
        self.selected_recipe_id
            .as_deref()
            .and_then(|id| self.recipe_by_id(id))
    }

    /// Select a recipe for the detail view. Unknown ids clear the selection.
    pub fn select_recipe(&mut self, id: Option<&str>) {
        self.selected_recipe_id = id
            .filter(|id| self.recipe_by_id(id).is_some())
            .map(str::to_string);
    }

    pub fn navigate_to(&mut self, view: View) {
        self.view = view;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.selected_category = category;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn toggle_favorites(&mut self) {
        self.filter_favorites = !self.filter_favorites;
    }

    /// Recipes passing the category, search and favourites filters
    pub fn visible_recipes(&self) -> Vec<&Record> {
        let needle = self.search_term.trim().to_lowercase();

        self.partition
            .recipes
            .iter()
            .filter(|r| match self.selected_category.as_deref() {
                Some(category) => r.get_str("category") == Some(category),
                None => true,
            })
            .filter(|r| {
                needle.is_empty()
                    || r.get_str("title")
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .filter(|r| !self.filter_favorites || r.get_bool("isFavorite") == Some(true))
            .collect()
    }

    /// Plan entries stored for the current week
    pub fn plan_for_week(&self) -> Vec<&Record> {
        let week = self.week_start.format("%Y-%m-%d").to_string();
        self.partition
            .plan_entries
            .iter()
            .filter(|r| r.get_str("weekStart") == Some(week.as_str()))
            .collect()
    }

    /// Move the current week forwards or backwards.
    /// Leaves the week unchanged if the result falls outside the calendar.
    pub fn shift_week(&mut self, weeks: i64) {
        match Duration::try_weeks(weeks).and_then(|d| self.week_start.checked_add_signed(d)) {
            Some(next) => self.week_start = next,
            None => tracing::warn!(
                week_start = %self.week_start,
                weeks,
                "Week shift out of range, keeping current week"
            ),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}
