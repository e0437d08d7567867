//! Derivation steps shown alongside a result.

use serde::{Deserialize, Serialize};

/// One step of a derivation: a sentence and a LaTeX formula.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Plain-language description.
    pub description: String,
    /// LaTeX formula; empty when the step has none.
    pub formula: String,
}

impl Step {
    /// Creates a step.
    pub fn new(description: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            formula: formula.into(),
        }
    }
}

/// Ordered derivation steps.
#[derive(Clone, Debug, Default)]
pub struct Steps(Vec<Step>);

impl Steps {
    /// Appends a step.
    pub fn push(&mut self, description: impl Into<String>, formula: impl Into<String>) {
        self.0.push(Step::new(description, formula));
    }

    /// The collected steps.
    #[must_use]
    pub fn into_vec(self) -> Vec<Step> {
        self.0
    }
}

/// `\int_{a}^{b} body \, dx`
pub(crate) fn definite_integral(a: &str, b: &str, body: &str) -> String {
    format!("\\int_{{{a}}}^{{{b}}} {body} \\, dx")
}
