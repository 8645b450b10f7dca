//! Progress reporting while a content request is polled

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use octophyx_application::PollObserver;
use octophyx_domain::ContentStatus;
use std::time::Duration;

/// Spinner that tracks the observed status of one request
pub struct ProgressReporter {
    spinner: ProgressBar,
    working: &'static str,
}

impl ProgressReporter {
    pub fn new(topic: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(topic.to_string());
        spinner.set_message(Self::status_message(ContentStatus::Pending));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self {
            spinner,
            working: "Generating explanation, animation and diagram...",
        }
    }

    /// Message shown while `generating`
    pub fn with_working_message(mut self, message: &'static str) -> Self {
        self.working = message;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn status_message(status: ContentStatus) -> String {
        match status {
            ContentStatus::Pending => "Waiting to start...".to_string(),
            ContentStatus::Generating => "Generating explanation, animation and diagram...".to_string(),
            ContentStatus::Completed => format!("{}", "Completed".green()),
            ContentStatus::Failed => format!("{}", "Failed".red()),
        }
    }

    /// Stop the spinner without a final status, e.g. on Ctrl+C
    pub fn abandon(&self, message: &str) {
        self.spinner.abandon_with_message(message.to_string());
    }
}

impl PollObserver for ProgressReporter {
    fn on_transition(&self, _from: ContentStatus, to: ContentStatus) {
        match to {
            ContentStatus::Generating => self.spinner.set_message(self.working),
            _ if to.is_terminal() => self.spinner.finish_with_message(Self::status_message(to)),
            _ => self.spinner.set_message(Self::status_message(to)),
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PollObserver for SimpleProgress {
    fn on_transition(&self, from: ContentStatus, to: ContentStatus) {
        let marker = match to {
            ContentStatus::Completed => "v".green(),
            ContentStatus::Failed => "x".red(),
            _ => "->".cyan(),
        };
        eprintln!("{} {} -> {}", marker, from, to.as_str().bold());
    }
}
