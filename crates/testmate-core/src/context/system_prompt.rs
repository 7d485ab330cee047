use crate::error::{Result, TestmateError};
use serde::{Deserialize, Serialize};

/// A named preset that customizes the objective of the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub id: String,
    pub title: String,
    pub objective: String,
}

impl UseCase {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        objective: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            objective: objective.into(),
        }
    }
}

const BUILTIN_USE_CASES: &[(&str, &str, &str)] = &[
    (
        "use-case-1",
        "User Stories",
        "Generate user story, derive test specifications and automate them",
    ),
    (
        "use-case-2",
        "API Test Cases",
        "Generate API test cases and automate them",
    ),
    (
        "use-case-3",
        "Test Strategy",
        "Generate test strategy and plan",
    ),
    (
        "use-case-4",
        "Functional Test Cases",
        "Generate functional test cases and analyze Jira user stories",
    ),
];

/// The enumerable table of recognized use cases. New presets are added as
/// entries, never as code branches.
#[derive(Debug, Clone)]
pub struct UseCaseCatalog {
    entries: Vec<UseCase>,
}

impl UseCaseCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_USE_CASES
                .iter()
                .map(|(id, title, objective)| UseCase::new(*id, *title, *objective))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add entries, replacing any existing entry with the same id.
    pub fn with_entries(mut self, extra: impl IntoIterator<Item = UseCase>) -> Self {
        for entry in extra {
            self.insert(entry);
        }
        self
    }

    pub fn insert(&mut self, entry: UseCase) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn resolve(&self, id: &str) -> Result<&UseCase> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| TestmateError::InvalidUseCase(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Display title for a stored selector; unknown selectors show as-is.
    pub fn title_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.as_str())
            .unwrap_or(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UseCase> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for UseCaseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builds the system prompt for a use case.
pub struct SystemPromptBuilder<'a> {
    use_case: &'a UseCase,
    custom_instructions: Option<String>,
}

impl<'a> SystemPromptBuilder<'a> {
    pub fn new(use_case: &'a UseCase) -> Self {
        Self {
            use_case,
            custom_instructions: None,
        }
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    pub fn build(&self) -> String {
        let mut prompt = format!(
            "To create a {} experience, greet users warmly and inquire about their test requirements. \
             Based on their input, generate test cases and strategies specific to their requirements.\n\n\
             Objective: {}.",
            self.use_case.title, self.use_case.objective
        );

        if let Some(ref instructions) = self.custom_instructions {
            let trimmed = instructions.trim();
            if !trimmed.is_empty() {
                prompt.push_str("\n\n");
                prompt.push_str(trimmed);
            }
        }

        prompt
    }
}
