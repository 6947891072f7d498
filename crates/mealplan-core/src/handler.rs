//! Change handler that drives the view
//!
//! On every notification the full collection is re-partitioned into the
//! application state and the active view is rendered again.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mealplan_data::{ChangeHandler, Record};
use mealplan_view::{AppState, Renderer};

pub struct ViewHandler {
    state: Arc<RwLock<AppState>>,
    renderer: Arc<RwLock<Arc<dyn Renderer>>>,
    /// Last rendered frame, `None` until the first render
    frame: Arc<RwLock<Option<String>>>,
    renders: Arc<AtomicU64>,
}

impl ViewHandler {
    pub fn new<R: Renderer + 'static>(state: AppState, renderer: R) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            renderer: Arc::new(RwLock::new(Arc::new(renderer))),
            frame: Arc::new(RwLock::new(None)),
            renders: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        f(&*self.state.read())
    }

    /// Change UI state and render the result
    pub fn update_state<F>(&self, f: F) -> String
    where
        F: FnOnce(&mut AppState),
    {
        f(&mut *self.state.write());
        self.render()
    }

    pub fn set_renderer<R: Renderer + 'static>(&self, renderer: R) {
        *self.renderer.write() = Arc::new(renderer);
    }

    pub fn render(&self) -> String {
        let renderer = self.renderer.read().clone();
        let frame = {
            let state = self.state.read();
            renderer.render(&state)
        };

        *self.frame.write() = Some(frame.clone());
        self.renders.fetch_add(1, Ordering::SeqCst);
        frame
    }

    pub fn frame(&self) -> Option<String> {
        self.frame.read().clone()
    }

    pub fn render_count(&self) -> u64 {
        self.renders.load(Ordering::SeqCst)
    }
}

impl ChangeHandler for ViewHandler {
    fn on_data_changed(&self, records: &[Record]) {
        self.state.write().apply(records);

        tracing::debug!(record_count = records.len(), "Re-deriving view state");

        self.render();
    }
}

impl Clone for ViewHandler {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            renderer: Arc::clone(&self.renderer),
            frame: Arc::clone(&self.frame),
            renders: Arc::clone(&self.renders),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mealplan_view::{HtmlRenderer, View};

    fn handler() -> ViewHandler {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        ViewHandler::new(AppState::new(today), HtmlRenderer::default())
    }

    struct CountingRenderer;

    impl Renderer for CountingRenderer {
        fn render(&self, state: &AppState) -> String {
            format!("{}:{}", state.view, state.partition.len())
        }
    }

    #[test]
    fn test_notification_repartitions_and_renders() {
        let handler = handler();
        assert!(handler.frame().is_none());

        handler.on_data_changed(&[
            Record::new("recipe_1"),
            Record::new("plan_1"),
            Record::new("mealSel_1"),
            Record::new("x").with_field("ingredientKey", "flour"),
        ]);

        handler.with_state(|state| {
            assert_eq!(state.recipes().len(), 1);
            assert_eq!(state.plan_entries().len(), 1);
            assert_eq!(state.meal_selections().len(), 1);
            assert_eq!(state.grocery_items().len(), 1);
        });
        assert_eq!(handler.render_count(), 1);
        assert!(handler.frame().unwrap().contains("Meal Planner"));
    }

    #[test]
    fn test_no_stale_slices() {
        let handler = handler();
        handler.on_data_changed(&[Record::new("recipe_1"), Record::new("recipe_2")]);
        handler.on_data_changed(&[Record::new("plan_1")]);

        handler.with_state(|state| {
            assert!(state.recipes().is_empty());
            assert_eq!(state.plan_entries().len(), 1);
        });
    }

    #[test]
    fn test_clones_share_state() {
        let handler = handler();
        let other = handler.clone();
        other.set_renderer(CountingRenderer);

        other.on_data_changed(&[Record::new("recipe_1")]);
        let frame = handler.update_state(|state| state.navigate_to(View::Recipes));

        assert_eq!(frame, "recipes:1");
        assert_eq!(handler.render_count(), 2);
    }
}
