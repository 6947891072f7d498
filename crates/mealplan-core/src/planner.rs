//! Planner instance
//!
//! Central coordination point: the data session owns the records, the view
//! handler owns the derived state, and every mutation flows from the first
//! to the second as a full-collection notification.

use chrono::{Local, NaiveDate};

use mealplan_data::{Ack, DataSdk, Record, RecordStore};
use mealplan_storage::Database;
use mealplan_view::{AppState, HtmlRenderer, UiConfig, View};

use crate::config::Config;
use crate::error::CoreError;
use crate::handler::ViewHandler;
use crate::Result;

const UI_CONFIG_SETTING: &str = "ui_config";

pub struct Planner {
    config: Config,
    db: Database,
    sdk: DataSdk,
    view: ViewHandler,
}

impl Planner {
    /// Open the on-disk database described by `config`
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db, Local::now().date_naive())
    }

    /// Build on an existing database, with `today` fixing the current week
    pub fn with_database(config: Config, db: Database, today: NaiveDate) -> Result<Self> {
        let ui = load_ui_config(&db, &config.ui);
        let sdk = DataSdk::new(RecordStore::with_key(db.clone(), config.storage_key.clone()));
        let view = ViewHandler::new(AppState::new(today), HtmlRenderer::new(ui));

        Ok(Self {
            config,
            db,
            sdk,
            view,
        })
    }

    /// Register the view with the data session; renders the stored records
    pub async fn initialize(&self) -> Result<Ack> {
        let ack = self.sdk.init(self.view.clone()).await?;

        tracing::info!(
            storage_key = %self.config.storage_key,
            recipes = self.view.with_state(|s| s.recipes().len()),
            "Planner initialized"
        );

        Ok(ack)
    }

    // === Record operations ===

    pub async fn create(&self, record: Record) -> Result<Ack> {
        Ok(self.sdk.create(record).await?)
    }

    pub async fn update(&self, record: Record) -> Result<Ack> {
        Ok(self.sdk.update(record).await?)
    }

    pub async fn delete(&self, record: &Record) -> Result<Ack> {
        Ok(self.sdk.delete(record).await?)
    }

    pub fn records(&self) -> Vec<Record> {
        self.sdk.records()
    }

    // === View state ===

    pub fn navigate_to(&self, view: View) -> String {
        tracing::debug!(view = %view, "Navigating");
        self.view.update_state(|state| state.navigate_to(view))
    }

    pub fn update_state<F>(&self, f: F) -> String
    where
        F: FnOnce(&mut AppState),
    {
        self.view.update_state(f)
    }

    pub fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.view.with_state(f)
    }

    /// Last rendered frame
    pub fn frame(&self) -> Result<String> {
        self.view.frame().ok_or(CoreError::NotInitialized)
    }

    // === UI configuration ===

    pub fn ui_config(&self) -> UiConfig {
        load_ui_config(&self.db, &self.config.ui)
    }

    /// Persist the styling object and re-render with it
    pub fn set_ui_config(&self, ui: UiConfig) -> Result<String> {
        let serialized = serde_json::to_string(&ui)?;
        self.db.set_setting(UI_CONFIG_SETTING, &serialized)?;

        self.view.set_renderer(HtmlRenderer::new(ui));
        Ok(self.view.render())
    }

    pub fn sdk(&self) -> &DataSdk {
        &self.sdk
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for Planner {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            sdk: self.sdk.clone(),
            view: self.view.clone(),
        }
    }
}

// Saved settings win over the configured defaults; unreadable ones are ignored
fn load_ui_config(db: &Database, fallback: &UiConfig) -> UiConfig {
    match db.get_setting(UI_CONFIG_SETTING) {
        Ok(Some(value)) => serde_json::from_str(&value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring corrupt UI settings");
            fallback.clone()
        }),
        Ok(None) => fallback.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read UI settings");
            fallback.clone()
        }
    }
}
