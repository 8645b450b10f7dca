//! Problem entity and its solution lifecycle.

use crate::catalog::TopicCategory;
use crate::content::entities::{ContentStatus, OwnerId};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest problem statement accepted, in characters.
pub const MIN_PROBLEM_CHARS: usize = 10;

/// Longest problem statement accepted, in characters.
pub const MAX_PROBLEM_CHARS: usize = 4000;

/// At most this many steps are kept from a solution.
pub const MAX_SOLUTION_STEPS: usize = 10;

/// Identifier of a persisted problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(i64);

impl ProblemId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProblemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A problem statement (Value Object). Always trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemText {
    content: String,
}

impl ProblemText {
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        let chars = trimmed.chars().count();
        if chars < MIN_PROBLEM_CHARS {
            return Err(DomainError::InvalidProblem(format!(
                "problem must be at least {} characters",
                MIN_PROBLEM_CHARS
            )));
        }
        if chars > MAX_PROBLEM_CHARS {
            return Err(DomainError::InvalidProblem(format!(
                "problem exceeds {} characters",
                MAX_PROBLEM_CHARS
            )));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// The first `max` characters, for prompts and one-line listings
    pub fn excerpt(&self, max: usize) -> &str {
        match self.content.char_indices().nth(max) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}

impl fmt::Display for ProblemText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for ProblemText {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ProblemText::try_new(s)
    }
}

impl From<ProblemText> for String {
    fn from(text: ProblemText) -> Self {
        text.content
    }
}

/// Split a solution into its steps: paragraphs separated by a blank line,
/// blank paragraphs dropped, at most [`MAX_SOLUTION_STEPS`].
pub fn solution_steps(solution: &str) -> Vec<String> {
    solution
        .split("\n\n")
        .filter(|step| !step.trim().is_empty())
        .take(MAX_SOLUTION_STEPS)
        .map(str::to_string)
        .collect()
}

/// Data needed to create a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProblem {
    pub text: ProblemText,
    pub category: Option<TopicCategory>,
    pub owner: Option<OwnerId>,
}

impl NewProblem {
    pub fn new(text: ProblemText, owner: Option<OwnerId>) -> Self {
        Self {
            text,
            category: None,
            owner,
        }
    }

    pub fn with_category(mut self, category: Option<TopicCategory>) -> Self {
        self.category = category;
        self
    }
}

/// Output of a finished solution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolvedProblem {
    pub solution: String,
    /// `None` when the diagram step failed or returned nothing
    pub diagram_url: Option<String>,
}

/// A submitted problem together with its generated solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSolution {
    pub id: ProblemId,
    pub problem_text: ProblemText,
    pub category: Option<TopicCategory>,
    pub owner: Option<OwnerId>,
    pub status: ContentStatus,
    pub solution: Option<String>,
    pub steps: Vec<String>,
    pub diagram_url: Option<String>,
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProblemSolution {
    /// A fresh `Pending`, unbookmarked problem.
    pub fn new(id: ProblemId, problem: NewProblem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            problem_text: problem.text,
            category: problem.category,
            owner: problem.owner,
            status: ContentStatus::Pending,
            solution: None,
            steps: Vec::new(),
            diagram_url: None,
            bookmarked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// `Pending → Generating`
    pub fn start_generation(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(ContentStatus::Generating, now)
    }

    /// `Generating → Completed`, storing the solution and its steps.
    pub fn complete(&mut self, solved: SolvedProblem, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(ContentStatus::Completed, now)?;
        self.steps = solution_steps(&solved.solution);
        self.solution = Some(solved.solution);
        self.diagram_url = solved.diagram_url.filter(|url| !url.trim().is_empty());
        Ok(())
    }

    /// `Generating → Failed`
    pub fn fail(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(ContentStatus::Failed, now)
    }

    /// Flip the bookmark flag in any status; returns the new value.
    pub fn toggle_bookmark(&mut self, now: DateTime<Utc>) -> bool {
        self.bookmarked = !self.bookmarked;
        self.updated_at = now;
        self.bookmarked
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(&mut self, next: ContentStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.advance(next)?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> ProblemSolution {
        let text = ProblemText::try_new("A 2 kg block slides down a 30° frictionless incline.").unwrap();
        ProblemSolution::new(
            ProblemId::new(1),
            NewProblem::new(text, Some(OwnerId::new(3)))
                .with_category(Some(TopicCategory::Mechanics)),
            Utc::now(),
        )
    }

    #[test]
    fn test_problem_text_minimum_length() {
        assert!(ProblemText::try_new("too short").is_err());
        assert!(ProblemText::try_new("   ten chars!   ").is_ok());
        assert!(matches!(
            ProblemText::try_new("   v = d/t   "),
            Err(DomainError::InvalidProblem(_))
        ));
        assert!(ProblemText::try_new("x".repeat(MAX_PROBLEM_CHARS + 1)).is_err());
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let text = ProblemText::try_new("Δv = a·t for a falling ball").unwrap();
        assert_eq!(text.excerpt(6), "Δv = a");
        assert_eq!(text.excerpt(500), text.as_str());
    }

    #[test]
    fn test_solution_steps_split_on_blank_lines() {
        let steps = solution_steps("Step 1: draw forces\n\n\n\nStep 2: F = ma\nso a = g sin θ\n\n  \n\nStep 3: done");
        assert_eq!(
            steps,
            vec![
                "Step 1: draw forces",
                "Step 2: F = ma\nso a = g sin θ",
                "Step 3: done",
            ]
        );
    }

    #[test]
    fn test_solution_steps_capped() {
        let solution = (1..=14).map(|i| format!("step {}", i)).collect::<Vec<_>>().join("\n\n");
        let steps = solution_steps(&solution);
        assert_eq!(steps.len(), MAX_SOLUTION_STEPS);
        assert_eq!(steps[9], "step 10");
    }

    #[test]
    fn test_complete_stores_solution_and_steps() {
        let mut p = problem();
        p.start_generation(Utc::now()).unwrap();
        p.complete(
            SolvedProblem {
                solution: "Resolve gravity.\n\na = g sin 30° = 4.9 m/s²".to_string(),
                diagram_url: Some(" ".to_string()),
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(p.status, ContentStatus::Completed);
        assert_eq!(p.steps.len(), 2);
        assert!(p.solution.as_deref().unwrap().starts_with("Resolve gravity."));
        assert!(p.diagram_url.is_none());
    }

    #[test]
    fn test_solution_lifecycle_is_one_way() {
        let mut p = problem();
        assert!(p.complete(SolvedProblem::default(), Utc::now()).is_err());
        p.start_generation(Utc::now()).unwrap();
        p.fail(Utc::now()).unwrap();
        assert!(p.start_generation(Utc::now()).unwrap_err().is_invalid_transition());
        assert!(p.solution.is_none());
        assert!(p.steps.is_empty());
    }

    #[test]
    fn test_bookmark_toggles_in_any_status() {
        let mut p = problem();
        assert!(p.toggle_bookmark(Utc::now()));
        p.start_generation(Utc::now()).unwrap();
        p.fail(Utc::now()).unwrap();
        assert!(!p.toggle_bookmark(Utc::now()));
        assert_eq!(p.status, ContentStatus::Failed);
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(problem()).unwrap();
        assert_eq!(json["problemText"], "A 2 kg block slides down a 30° frictionless incline.");
        assert_eq!(json["category"], "mechanics");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["bookmarked"], false);
        assert!(json["steps"].as_array().unwrap().is_empty());
    }
}
