//! Output formatting for human and JSON modes
//!
//! Every result a command prints implements [`Render`]: a human-readable
//! text form with coloured status badges, and pretty JSON for machines.

use std::fmt::Write as _;
use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::api::{CategoriesData, StatsData, StatusData, TimelineData};
use crate::config::Config;
use crate::core::models::{
    CheckStatus, CrossCheckOutcome, VerificationOutcome, VerificationStatus,
};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Something a command can print
pub trait Render: Serialize {
    /// Human-readable text, without a trailing newline
    fn to_human(&self) -> String;

    /// Pretty-printed JSON
    fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Print in the requested mode
    fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.to_human()),
            OutputMode::Json => println!("{}", self.to_json()),
        }
    }
}

/// Coloured badge for an overall decision
#[must_use]
pub fn status_badge(status: VerificationStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        VerificationStatus::Approved => text.green().bold(),
        VerificationStatus::Rejected => text.red().bold(),
        VerificationStatus::NeedsReview => text.yellow().bold(),
    }
}

fn check_badge(status: CheckStatus) -> ColoredString {
    let text = format!("{:<7}", status.to_string());
    match status {
        CheckStatus::Passed => text.green(),
        CheckStatus::Warning => text.yellow(),
        CheckStatus::Failed => text.red(),
        CheckStatus::Skipped => text.dimmed(),
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n\n{heading}:");
    for item in items {
        let _ = write!(out, "\n  - {item}");
    }
}

impl Render for VerificationOutcome {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Issue #{}: {} (confidence {:.2}, {}ms)\n",
            self.issue_id,
            status_badge(self.status),
            self.confidence_score,
            self.processing_time_ms
        );
        for check in &self.checks {
            let _ = write!(
                out,
                "\n  {} {:<22} {:.2}  {}",
                check_badge(check.status),
                check.check.as_str(),
                check.confidence,
                check.details
            );
        }
        push_list(&mut out, "Rejection reasons", &self.rejection_reasons);
        push_list(&mut out, "Warnings", &self.warnings);
        out
    }
}

impl Render for CrossCheckOutcome {
    fn to_human(&self) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        let mut out = format!(
            "Issue #{} cross-check: {} (confidence {:.2}, {}ms)\n",
            self.issue_id,
            status_badge(self.status),
            self.confidence_score,
            self.processing_time_ms
        );
        let _ = write!(
            out,
            "\n  Same location:    {} ({:.1}m)\n  Work completed:   {}\n  Image similarity: {:.2}\n\n{}",
            yes_no(self.same_location),
            self.location_distance_meters,
            yes_no(self.work_completed),
            self.image_similarity_score,
            self.notes
        );
        push_list(&mut out, "Warnings", &self.warnings);
        out
    }
}

impl Render for StatusData {
    fn to_human(&self) -> String {
        format!(
            "Issue #{}: {} (confidence {:.2})\n  Type:          {}\n  Verifications: {}\n  First:         {}\n  Latest:        {}",
            self.issue_id,
            status_badge(self.status),
            self.confidence_score,
            self.verification_type,
            self.verification_count,
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339()
        )
    }
}

impl Render for StatsData {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Verifications: {}\n  {}     {}\n  {}     {}\n  {} {}\n\nAverage confidence: {:.2}\nAverage time:       {}ms",
            self.total_verifications,
            status_badge(VerificationStatus::Approved),
            self.approved,
            status_badge(VerificationStatus::Rejected),
            self.rejected,
            status_badge(VerificationStatus::NeedsReview),
            self.needs_review,
            self.average_confidence,
            self.average_processing_time_ms
        );
        if !self.by_type.is_empty() {
            out.push_str("\n\nBy type:");
            for (kind, count) in &self.by_type {
                let _ = write!(out, "\n  {kind:<20} {count}");
            }
        }
        out
    }
}

impl Render for TimelineData {
    fn to_human(&self) -> String {
        if self.events.is_empty() {
            return format!("No timeline events for issue #{}", self.issue_id);
        }
        let mut out = format!("Issue #{} timeline:", self.issue_id);
        for event in &self.events {
            let _ = write!(
                out,
                "\n  {}  {} {}",
                event.created_at.format("%Y-%m-%d %H:%M:%S"),
                format!("[{}]", event.actor_type).dimmed(),
                event.description
            );
        }
        out
    }
}

impl Render for CategoriesData {
    fn to_human(&self) -> String {
        let mut out = format!("{} supported categories:", self.categories.len());
        for name in &self.categories {
            let _ = write!(out, "\n  {name}");
        }
        out
    }
}

/// The active configuration and where it came from
#[derive(Debug, Serialize)]
pub struct ConfigView {
    /// File it was loaded from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    /// Where records are stored
    pub store_path: PathBuf,
    /// The configuration itself
    pub config: Config,
}

impl Render for ConfigView {
    fn to_human(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());
        let body = self.config.to_toml().unwrap_or_default();
        format!(
            "# source: {source}\n# store:  {}\n\n{}",
            self.store_path.display(),
            body.trim_end()
        )
    }
}
