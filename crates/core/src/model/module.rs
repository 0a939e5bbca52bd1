use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ModuleId, StepId};
use crate::model::locale::Localized;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("a module must contain at least one step")]
    NoSteps,

    #[error("duplicate step id within module: {0}")]
    DuplicateStepId(StepId),
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// Difficulty tier shown on the module card and filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Content type of a step; determines which interactive renderer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Introduction,
    Tutorial,
    Interactive,
    Checklist,
    DecisionTree,
    Summary,
}

//
// ─── INTERACTIVE ELEMENTS ──────────────────────────────────────────────────────
//

/// One selectable answer in a decision tree, paired with the static result
/// text revealed when it is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    text: Localized,
    result: Localized,
}

impl DecisionOption {
    #[must_use]
    pub fn new(text: Localized, result: Localized) -> Self {
        Self { text, result }
    }

    #[must_use]
    pub fn text(&self) -> &Localized {
        &self.text
    }

    #[must_use]
    pub fn result(&self) -> &Localized {
        &self.result
    }
}

/// Optional interactive descriptor attached to a step.
///
/// A checklist holds independently togglable items; a decision tree poses a
/// single question whose selected option reveals a static result. An element
/// with no items/options is tolerated and simply renders nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "data")]
pub enum InteractiveElement {
    Checklist { items: Vec<Localized> },
    DecisionTree {
        question: Localized,
        options: Vec<DecisionOption>,
    },
}

impl InteractiveElement {
    /// Number of togglable/selectable sub-elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            InteractiveElement::Checklist { items } => items.len(),
            InteractiveElement::DecisionTree { options, .. } => options.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// One unit of instructional content within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    title: Localized,
    kind: StepKind,
    estimated_minutes: u32,
    content: Localized,
    interactive: Option<InteractiveElement>,
    tips: Vec<Localized>,
}

impl Step {
    #[must_use]
    pub fn new(
        id: StepId,
        title: Localized,
        kind: StepKind,
        estimated_minutes: u32,
        content: Localized,
    ) -> Self {
        Self {
            id,
            title,
            kind,
            estimated_minutes,
            content,
            interactive: None,
            tips: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: InteractiveElement) -> Self {
        self.interactive = Some(interactive);
        self
    }

    #[must_use]
    pub fn with_tips(mut self, tips: Vec<Localized>) -> Self {
        self.tips = tips;
        self
    }

    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &Localized {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    #[must_use]
    pub fn content(&self) -> &Localized {
        &self.content
    }

    #[must_use]
    pub fn interactive(&self) -> Option<&InteractiveElement> {
        self.interactive.as_ref()
    }

    #[must_use]
    pub fn tips(&self) -> &[Localized] {
        &self.tips
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// A named, ordered sequence of instructional steps.
///
/// Step order is fixed at construction and defines the navigation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    id: ModuleId,
    title: Localized,
    description: Localized,
    difficulty: Difficulty,
    category: Localized,
    learning_objectives: Vec<Localized>,
    steps: Vec<Step>,
}

impl Module {
    /// Creates a module, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoSteps` if `steps` is empty, or
    /// `ModuleError::DuplicateStepId` if two steps share an id.
    pub fn new(
        id: ModuleId,
        title: Localized,
        description: Localized,
        difficulty: Difficulty,
        category: Localized,
        learning_objectives: Vec<Localized>,
        steps: Vec<Step>,
    ) -> Result<Self, ModuleError> {
        if steps.is_empty() {
            return Err(ModuleError::NoSteps);
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|other| other.id() == step.id()) {
                return Err(ModuleError::DuplicateStepId(step.id().clone()));
            }
        }

        Ok(Self {
            id,
            title,
            description,
            difficulty,
            category,
            learning_objectives,
            steps,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &Localized {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &Localized {
        &self.description
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn category(&self) -> &Localized {
        &self.category
    }

    #[must_use]
    pub fn learning_objectives(&self) -> &[Localized] {
        &self.learning_objectives
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps; always at least one.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Ordinal position of a step id, if present.
    #[must_use]
    pub fn position_of(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id() == id)
    }

    /// Total estimated duration: the sum of step durations, in minutes.
    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.steps
            .iter()
            .map(Step::estimated_minutes)
            .fold(0, u32::saturating_add)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, minutes: u32) -> Step {
        Step::new(
            StepId::new(id).unwrap(),
            Localized::english(id),
            StepKind::Tutorial,
            minutes,
            Localized::english("content"),
        )
    }

    fn build_module(steps: Vec<Step>) -> Result<Module, ModuleError> {
        Module::new(
            ModuleId::new("business-networking").unwrap(),
            Localized::new("Business Networking", "Networking Empresarial"),
            Localized::english("desc"),
            Difficulty::Intermediate,
            Localized::new("Professional", "Profissional"),
            vec![],
            steps,
        )
    }

    #[test]
    fn module_requires_at_least_one_step() {
        assert_eq!(build_module(vec![]).unwrap_err(), ModuleError::NoSteps);
    }

    #[test]
    fn module_rejects_duplicate_step_ids() {
        let err = build_module(vec![step("s1", 3), step("s2", 4), step("s1", 5)]).unwrap_err();
        assert_eq!(
            err,
            ModuleError::DuplicateStepId(StepId::new("s1").unwrap())
        );
    }

    #[test]
    fn estimated_minutes_sums_step_durations() {
        let module = build_module(vec![step("s1", 4), step("s2", 6), step("s3", 5)]).unwrap();
        assert_eq!(module.estimated_minutes(), 15);
    }

    #[test]
    fn position_of_finds_authored_order() {
        let module = build_module(vec![step("s1", 1), step("s2", 1)]).unwrap();
        assert_eq!(module.position_of(&StepId::new("s2").unwrap()), Some(1));
        assert_eq!(module.position_of(&StepId::new("missing").unwrap()), None);
    }

    #[test]
    fn interactive_element_len_counts_sub_elements() {
        let checklist = InteractiveElement::Checklist {
            items: vec![
                Localized::english("Prepare your heritage story"),
                Localized::english("Research 3 business leaders"),
            ],
        };
        assert_eq!(checklist.len(), 2);

        let empty = InteractiveElement::Checklist { items: vec![] };
        assert!(empty.is_empty());
    }
}
