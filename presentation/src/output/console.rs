//! Console output formatter for content requests, problems and topics

use crate::output::markdown::TerminalRenderer;
use colored::{ColoredString, Colorize};
use octophyx_domain::{ContentRequest, ContentStatus, PhysicsTopic, ProblemSolution};
use serde::Serialize;

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one content request, with the explanation rendered
    pub fn format_request(request: &ContentRequest) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(request.topic.as_str()));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Id:".cyan().bold(), request.id));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(request.status)
        ));
        if let Some(owner) = request.owner {
            output.push_str(&format!("{} {}\n", "Owner:".cyan().bold(), owner));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Updated:".cyan().bold(),
            request.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        match request.status {
            ContentStatus::Pending | ContentStatus::Generating => {
                output.push_str(&format!(
                    "\n{}\n",
                    "Content is still being generated.".dimmed()
                ));
            }
            ContentStatus::Failed => {
                output.push_str(&format!(
                    "\n{}\n",
                    "Generation failed. Submit the topic again to retry.".red()
                ));
            }
            ContentStatus::Completed => {
                if let Some(explanation) = &request.explanation {
                    output.push_str(&Self::section_header("Explanation"));
                    output.push('\n');
                    output.push_str(&TerminalRenderer::render_markdown(explanation));
                    output.push('\n');
                }
                if let Some(code) = &request.animation_code {
                    output.push_str(&Self::section_header("Animation (Manim)"));
                    output.push('\n');
                    output.push_str(&Self::indent(code, "  "));
                    output.push('\n');
                }
                output.push_str(&Self::section_header("Diagram"));
                match &request.diagram_url {
                    Some(url) => output.push_str(&format!("\n{}\n", url.blue().underline())),
                    None => output.push_str(&format!("\n{}\n", "No diagram available".dimmed())),
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// One-line summary used right after submission
    pub fn format_submitted(request: &ContentRequest) -> String {
        format!(
            "{} content request {} for {} ({})",
            "Submitted".green().bold(),
            request.id.to_string().bold(),
            request.topic.as_str().bold(),
            Self::status_label(request.status)
        )
    }

    /// Table of an owner's requests, newest first
    pub fn format_history(requests: &[ContentRequest]) -> String {
        if requests.is_empty() {
            return format!("{}\n", "No content requests yet".dimmed());
        }

        let mut output = Self::section_header("Content History");
        for request in requests {
            output.push_str(&format!(
                "  {:>6}  {:<12}  {}  {}\n",
                request.id.to_string(),
                Self::status_label(request.status),
                request.created_at.format("%Y-%m-%d %H:%M"),
                request.topic
            ));
        }
        output
    }

    /// Format one problem with its numbered solution steps
    pub fn format_problem(problem: &ProblemSolution) -> String {
        let mut output = Self::header(&format!("Problem {}", problem.id));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(problem.status)
        ));
        if let Some(category) = problem.category {
            output.push_str(&format!("{} {}\n", "Category:".cyan().bold(), category));
        }
        if problem.bookmarked {
            output.push_str(&format!("{} {}\n", "Bookmarked:".cyan().bold(), "yes".yellow()));
        }

        output.push_str(&Self::section_header("Problem"));
        output.push_str(&Self::indent(problem.problem_text.as_str(), "  "));
        output.push('\n');

        match problem.status {
            ContentStatus::Pending | ContentStatus::Generating => {
                output.push_str(&format!("\n{}\n", "Solution is still being generated.".dimmed()));
            }
            ContentStatus::Failed => {
                output.push_str(&format!(
                    "\n{}\n",
                    "Solving failed. Submit the problem again to retry.".red()
                ));
            }
            ContentStatus::Completed => {
                output.push_str(&Self::section_header("Solution"));
                for (number, step) in problem.steps.iter().enumerate() {
                    output.push_str(&format!("\n{}\n", format!("Step {}", number + 1).bold()));
                    output.push_str(&TerminalRenderer::render_markdown(step));
                    output.push('\n');
                }
                if let Some(url) = &problem.diagram_url {
                    output.push_str(&Self::section_header("Diagram"));
                    output.push_str(&format!("{}\n", url.blue().underline()));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// One-line summary used right after a problem is submitted
    pub fn format_problem_submitted(problem: &ProblemSolution) -> String {
        format!(
            "{} problem {} ({})",
            "Submitted".green().bold(),
            problem.id.to_string().bold(),
            Self::status_label(problem.status)
        )
    }

    /// Table of an owner's problems, newest first
    pub fn format_problems(problems: &[ProblemSolution]) -> String {
        if problems.is_empty() {
            return format!("{}\n", "No problems yet".dimmed());
        }

        let mut output = Self::section_header("Problem History");
        for problem in problems {
            let marker = if problem.bookmarked { "*".yellow() } else { " ".normal() };
            output.push_str(&format!(
                "  {:>6} {} {:<12}  {}  {}\n",
                problem.id.to_string(),
                marker,
                Self::status_label(problem.status),
                problem.created_at.format("%Y-%m-%d %H:%M"),
                problem.problem_text.excerpt(60)
            ));
        }
        output
    }

    /// Numbered hint list
    pub fn format_hints(hints: &[String]) -> String {
        let mut output = Self::section_header("Hints");
        for (number, hint) in hints.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", number + 1, hint));
        }
        output
    }

    /// Catalog listing grouped by category
    pub fn format_topics(topics: &[&PhysicsTopic]) -> String {
        if topics.is_empty() {
            return format!("{}\n", "No matching topics".dimmed());
        }

        let mut output = String::new();
        let mut current = None;
        for topic in topics {
            if current != Some(topic.category) {
                current = Some(topic.category);
                output.push_str(&Self::section_header(&Self::title_case(
                    topic.category.as_str(),
                )));
            }
            output.push_str(&format!(
                "  {} {}\n      {}\n",
                "*".cyan(),
                topic.name.bold(),
                topic.description.dimmed()
            ));
        }
        output
    }

    /// Format any serializable value as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn status_label(status: ContentStatus) -> ColoredString {
        match status {
            ContentStatus::Pending => status.as_str().yellow(),
            ContentStatus::Generating => status.as_str().blue(),
            ContentStatus::Completed => status.as_str().green(),
            ContentStatus::Failed => status.as_str().red(),
        }
    }

    fn title_case(word: &str) -> String {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use octophyx_domain::{
        ContentId, GeneratedContent, NewContentRequest, NewProblem, OwnerId, ProblemId,
        ProblemText, SolvedProblem, Topic, TopicCatalog, TopicCategory,
    };

    fn request(topic: &str) -> ContentRequest {
        ContentRequest::new(
            ContentId::new(3),
            NewContentRequest::new(Topic::try_new(topic).unwrap(), Some(OwnerId::new(9))),
            Utc::now(),
        )
    }

    #[test]
    fn test_completed_request_renders_sections() {
        let mut record = request("Ohm's Law");
        let now = Utc::now();
        record.start_generation(now).unwrap();
        record
            .complete(
                GeneratedContent {
                    explanation: "# Ohm\n\n$V = IR$".to_string(),
                    animation_code: "class Ohm(Scene): pass".to_string(),
                    diagram_url: None,
                },
                now,
            )
            .unwrap();

        let output = ConsoleFormatter::format_request(&record);
        assert!(output.contains("Ohm's Law"));
        assert!(output.contains("Explanation"));
        assert!(output.contains("V = IR"));
        assert!(output.contains("  class Ohm(Scene): pass"));
        assert!(output.contains("No diagram available"));
    }

    #[test]
    fn test_pending_request_has_no_content_sections() {
        let output = ConsoleFormatter::format_request(&request("Doppler Effect"));
        assert!(output.contains("still being generated"));
        assert!(!output.contains("Explanation"));
    }

    #[test]
    fn test_history_lists_each_request() {
        let output =
            ConsoleFormatter::format_history(&[request("Doppler Effect"), request("Ohm's Law")]);
        assert!(output.contains("Doppler Effect"));
        assert!(output.contains("Ohm's Law"));
        assert!(ConsoleFormatter::format_history(&[]).contains("No content requests"));
    }

    #[test]
    fn test_topics_grouped_by_category() {
        let catalog = TopicCatalog::builtin();
        let optics = catalog.by_category(TopicCategory::Optics);
        let output = ConsoleFormatter::format_topics(&optics);
        assert!(output.contains("Optics"));
        assert!(output.contains("Snell's Law"));
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let json = ConsoleFormatter::format_json(&request("Doppler Effect"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("createdAt").is_some());
    }

    fn problem() -> ProblemSolution {
        ProblemSolution::new(
            ProblemId::new(8),
            NewProblem::new(
                ProblemText::try_new("A 2 m pendulum swings with small amplitude. Find its period.")
                    .unwrap(),
                Some(OwnerId::new(1)),
            )
            .with_category(Some(TopicCategory::Mechanics)),
            Utc::now(),
        )
    }

    #[test]
    fn test_solved_problem_numbers_steps() {
        let mut solved = problem();
        solved.start_generation(Utc::now()).unwrap();
        solved
            .complete(
                SolvedProblem {
                    solution: "Use $T = 2\\pi\\sqrt{L/g}$.\n\nT ≈ 2.84 s".to_string(),
                    diagram_url: None,
                },
                Utc::now(),
            )
            .unwrap();
        solved.toggle_bookmark(Utc::now());

        let output = ConsoleFormatter::format_problem(&solved);
        assert!(output.contains("Problem 8"));
        assert!(output.contains("mechanics"));
        assert!(output.contains("Step 1"));
        assert!(output.contains("Step 2"));
        assert!(output.contains("T ≈ 2.84 s"));
        assert!(output.contains("Bookmarked"));
    }

    #[test]
    fn test_generating_problem_has_no_steps() {
        let output = ConsoleFormatter::format_problem(&problem());
        assert!(output.contains("still being generated"));
        assert!(!output.contains("Step 1"));
    }

    #[test]
    fn test_problem_history_and_hints() {
        let output = ConsoleFormatter::format_problems(&[problem()]);
        assert!(output.contains("A 2 m pendulum swings"));
        assert!(ConsoleFormatter::format_problems(&[]).contains("No problems yet"));

        let hints = ConsoleFormatter::format_hints(&["Recall T = 2π√(L/g).".to_string()]);
        assert!(hints.contains("1. Recall T = 2π√(L/g)."));
    }
}
