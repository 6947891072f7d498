//! Collection partitioning

use serde::Serialize;

use mealplan_data::Record;

use crate::kind::RecordKind;

/// The collection split by kind. Each record lands in exactly one slice and
/// keeps its relative order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    pub recipes: Vec<Record>,
    pub plan_entries: Vec<Record>,
    pub meal_selections: Vec<Record>,
    pub grocery_items: Vec<Record>,
    pub unclassified: Vec<Record>,
}

impl Partition {
    pub fn derive(records: &[Record]) -> Self {
        let mut partition = Self::default();

        for record in records {
            partition.slice_mut(RecordKind::classify(record)).push(record.clone());
        }

        if !partition.unclassified.is_empty() {
            tracing::debug!(
                count = partition.unclassified.len(),
                "Records matched no category"
            );
        }

        partition
    }

    pub fn slice(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Recipe => &self.recipes,
            RecordKind::PlanEntry => &self.plan_entries,
            RecordKind::MealSelection => &self.meal_selections,
            RecordKind::GroceryItem => &self.grocery_items,
            RecordKind::Unclassified => &self.unclassified,
        }
    }

    fn slice_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Recipe => &mut self.recipes,
            RecordKind::PlanEntry => &mut self.plan_entries,
            RecordKind::MealSelection => &mut self.meal_selections,
            RecordKind::GroceryItem => &mut self.grocery_items,
            RecordKind::Unclassified => &mut self.unclassified,
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
            + self.plan_entries.len()
            + self.meal_selections.len()
            + self.grocery_items.len()
            + self.unclassified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
