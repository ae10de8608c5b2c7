//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verdict_domain::{AnswerRecord, Decision, Example};

/// Instructions shown once after a successful login.
const INSTRUCTIONS: &str = "\
You will receive a claim and all the evidence sentences at once.

Your task:
  - Read the claim.
  - Read all evidence sentences.
  - Then decide:

    Support      -> The evidence fully supports the claim.
    Refute       -> At least one evidence sentence contradicts the claim.
    Can't Decide -> The evidence is insufficient or unclear.

After you choose, the next example will appear automatically.
After finishing all examples, type 'finish' to save your answers.";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format saved results.
    pub fn format_results(&self, results: &[AnswerRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_results_json(results),
            OutputFormat::Table => self.format_results_table(results),
            OutputFormat::Quiet => self.format_results_quiet(results),
        }
    }

    /// Format results as JSON.
    fn format_results_json(&self, results: &[AnswerRecord]) -> Result<String> {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "user_id": r.user_id,
                    "example_id": r.example_id.value(),
                    "claim": r.claim,
                    "decision": r.decision.as_str(),
                    "timestamp": r.timestamp
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_results)?)
    }

    /// Format results as a table.
    fn format_results_table(&self, results: &[AnswerRecord]) -> Result<String> {
        if results.is_empty() {
            return Ok(self.colorize("No results found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["User", "Example", "Claim", "Decision", "Timestamp"]);

        for result in results {
            builder.push_record([
                result.user_id.clone(),
                result.example_id.to_string(),
                truncate(&result.claim, 60),
                result.decision.label().to_string(),
                result.timestamp.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format results in quiet mode (one `user_id example_id decision` line each).
    fn format_results_quiet(&self, results: &[AnswerRecord]) -> Result<String> {
        let lines: Vec<String> = results
            .iter()
            .map(|r| format!("{}\t{}\t{}", r.user_id, r.example_id, r.decision))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Render one example: claim, numbered evidence, and the decision controls.
    pub fn format_example(&self, example: &Example, position: usize, total: usize) -> String {
        let mut out = String::new();
        out.push_str(&self.colorize(&format!("Example {} of {}", position, total), "cyan"));
        out.push_str("\n\n");
        out.push_str(&self.colorize("Claim:", "magenta"));
        out.push('\n');
        out.push_str(&example.claim);
        out.push_str("\n\n");
        out.push_str(&self.colorize("Evidence Sentences:", "magenta"));
        out.push('\n');
        for (number, sentence) in example.numbered_evidence() {
            out.push_str(&format!("{:>3}. {}\n", number, sentence));
        }
        out.push('\n');
        out.push_str(&self.decision_controls());
        out
    }

    /// The three decision controls with their shortcuts.
    pub fn decision_controls(&self) -> String {
        Decision::ALL
            .iter()
            .map(|d| format!("[{}] {}", shortcut(*d), d.label()))
            .collect::<Vec<_>>()
            .join("   ")
    }

    /// Survey instructions.
    pub fn instructions(&self) -> String {
        format!("{}\n\n{}", self.colorize("Instructions", "cyan"), INSTRUCTIONS)
    }

    /// Notice shown once every example has been answered.
    pub fn completion(&self) -> String {
        self.success("You have completed all examples!")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize, noun: &str) -> String {
        self.success(&format!("{} {} {}(s)", operation, count, noun))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Single-letter shortcut accepted for a decision.
pub fn shortcut(decision: Decision) -> char {
    match decision {
        Decision::Support => 's',
        Decision::Refute => 'r',
        Decision::CannotDecide => 'c',
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_domain::ExampleId;

    fn create_test_result() -> AnswerRecord {
        AnswerRecord {
            user_id: "user_1".to_string(),
            example_id: ExampleId::new(7),
            claim: "C7".to_string(),
            decision: Decision::CannotDecide,
            timestamp: 12345678,
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_results(&[create_test_result()]).unwrap();
        assert!(output.contains("\"decision\": \"cannot_decide\""));
        assert!(output.contains("\"example_id\": 7"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_results(&[create_test_result()]).unwrap();
        assert_eq!(output, "user_1\t7\tcannot_decide");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_results(&[create_test_result()]).unwrap();
        assert!(output.contains("Decision"));
        assert!(output.contains("Can't Decide"));
    }

    #[test]
    fn test_empty_results() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_results(&[]).unwrap();
        assert!(output.contains("No results found"));
    }

    #[test]
    fn test_example_rendering_numbers_evidence() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let example = Example::from_slots(ExampleId::new(7), "C7", ["first", "", "second"]).unwrap();
        let output = formatter.format_example(&example, 1, 2);

        assert!(output.starts_with("Example 1 of 2"));
        assert!(output.contains("C7"));
        assert!(output.contains("  1. first"));
        assert!(output.contains("  2. second"));
        assert!(output.contains("[s] Support   [r] Refute   [c] Can't Decide"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
