use super::component::Component;
use super::score::{round2, Score};
use crate::error::{GradeError, Result};
use crate::transmutation::TransmutationTable;

/// One student's components, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    name: Option<String>,
    components: Vec<Component>,
}

impl StudentRecord {
    /// Weights must sum to exactly 1 unless there are no components at all.
    pub fn new(name: Option<String>, components: Vec<Component>) -> Result<Self> {
        let record = Self { name, components };
        if !record.components.is_empty() && !record.is_valid_weight() {
            return Err(GradeError::InvalidWeight(record.total_weight()));
        }
        Ok(record)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(Component::weight).sum()
    }

    pub fn is_valid_weight(&self) -> bool {
        self.total_weight() == 1.0
    }

    /// Sum of weighted averages, re-rounded to two decimals so the table
    /// lookup never sees accumulated float error.
    pub fn initial_average(&self) -> f64 {
        round2(self.components.iter().map(Component::weighted_average).sum())
    }

    pub fn transmuted_average(&self, table: &TransmutationTable) -> Result<u32> {
        table.lookup(self.initial_average())
    }

    /// Copy of every component's scores, for restoring after a failed search.
    pub fn snapshot(&self) -> Vec<Vec<Score>> {
        self.components.iter().map(|c| c.scores().to_vec()).collect()
    }

    pub(crate) fn restore(&mut self, snapshot: Vec<Vec<Score>>) {
        for (component, scores) in self.components.iter_mut().zip(snapshot) {
            component.replace_scores(scores);
        }
    }
}
