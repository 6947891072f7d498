//! Screen rendering

use serde::{Deserialize, Serialize};

use mealplan_data::Record;

use crate::state::{AppState, View};

/// Styling and labels for the rendered screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub background_color: String,
    pub surface_color: String,
    pub text_color: String,
    pub primary_action_color: String,
    pub secondary_action_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub app_title: String,
    pub recipes_label: String,
    pub weekly_plan_label: String,
    pub grocery_list_label: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            background_color: "#1a1a2e".to_string(),
            surface_color: "#16213e".to_string(),
            text_color: "#eaeaea".to_string(),
            primary_action_color: "#0f3460".to_string(),
            secondary_action_color: "#533483".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 16,
            app_title: "Meal Planner".to_string(),
            recipes_label: "My Recipes".to_string(),
            weekly_plan_label: "Weekly Plan".to_string(),
            grocery_list_label: "Grocery List".to_string(),
        }
    }
}

/// Produces a full frame for the active view
pub trait Renderer: Send + Sync {
    fn render(&self, state: &AppState) -> String;
}

pub struct HtmlRenderer {
    config: UiConfig,
}

impl HtmlRenderer {
    pub fn new(config: UiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    fn render_home(&self, out: &mut String) {
        let c = &self.config;

        out.push_str("<div class=\"home\">\n");
        out.push_str(&format!(
            "  <h1 class=\"app-title\" style=\"color:{}; font-size:32px;\">{}</h1>\n",
            escape_html(&c.text_color),
            escape_html(&c.app_title)
        ));

        for (view, label) in [
            (View::Recipes, &c.recipes_label),
            (View::WeeklyPlan, &c.weekly_plan_label),
            (View::GroceryList, &c.grocery_list_label),
        ] {
            out.push_str(&format!(
                "  <button data-view=\"{}\" style=\"background:{}\">{}</button>\n",
                view,
                escape_html(&c.surface_color),
                escape_html(label)
            ));
        }

        out.push_str("</div>\n");
    }

    fn render_list<'a>(
        &self,
        out: &mut String,
        heading: &str,
        items: impl Iterator<Item = &'a Record>,
    ) {
        out.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape_html(heading)));
        for record in items {
            out.push_str(&format!(
                "  <li data-id=\"{}\">{}</li>\n",
                escape_html(&record.id),
                escape_html(display_label(record))
            ));
        }
        out.push_str("</ul>\n");
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, state: &AppState) -> String {
        let c = &self.config;
        let mut content = String::new();

        match state.view {
            View::Home => self.render_home(&mut content),
            View::Recipes => self.render_list(
                &mut content,
                &c.recipes_label,
                state.visible_recipes().into_iter(),
            ),
            View::WeeklyPlan => self.render_list(
                &mut content,
                &c.weekly_plan_label,
                state.plan_for_week().into_iter(),
            ),
            View::GroceryList => self.render_list(
                &mut content,
                &c.grocery_list_label,
                state.grocery_items().iter(),
            ),
        }

        format!(
            "<div style=\"background:{}; min-height:100%; font-family:{}; font-size:{}px;\">\n{}</div>\n",
            escape_html(&c.background_color),
            escape_html(&c.font_family),
            c.font_size,
            content
        )
    }
}

// Best human-readable name a record carries
fn display_label(record: &Record) -> &str {
    ["title", "name", "ingredientKey"]
        .iter()
        .find_map(|key| record.get_str(key))
        .unwrap_or(record.id.as_str())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
