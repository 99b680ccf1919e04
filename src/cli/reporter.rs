use colored::Colorize;

use webir_common::{SchemaViolation, WebirError};

/// Renders schema violations and terminal errors for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, violations: &[SchemaViolation]) -> String {
        let mut out = String::new();
        for (index, violation) in violations.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_violation(violation));
        }
        out
    }

    /// `<path> - error WIR1004: <message>`
    pub fn format_violation(&self, violation: &SchemaViolation) -> String {
        let path = if violation.instance_path.is_empty() {
            "/"
        } else {
            violation.instance_path.as_str()
        };
        format!(
            "{} - {} {}: {}",
            self.paint_location(path),
            self.paint_error("error"),
            self.format_code(violation.code.code()),
            violation.message
        )
    }

    /// Full report for an error that ends the run, context first.
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut output = format!("{}: {}", self.paint_error("error"), error);
        if let Some(WebirError::SchemaViolations(violations)) = error.downcast_ref::<WebirError>() {
            if !violations.is_empty() {
                output.push('\n');
                output.push_str(&self.render(violations));
                output.push_str("\n\n");
                output.push_str(&self.format_summary(violations.len()));
            }
            return output;
        }
        for cause in error.chain().skip(1) {
            output.push_str(&format!("\n  {} {cause}", self.paint_dimmed("caused by:")));
        }
        output
    }

    pub fn format_summary(&self, count: usize) -> String {
        let noun = if count == 1 { "violation" } else { "violations" };
        let summary = format!("Found {count} schema {noun}.");
        if self.color {
            summary.bold().to_string()
        } else {
            summary
        }
    }

    fn paint_location(&self, path: &str) -> String {
        if self.color {
            path.cyan().to_string()
        } else {
            path.to_string()
        }
    }

    fn paint_error(&self, label: &str) -> String {
        if self.color {
            label.red().bold().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_dimmed(&self, label: &str) -> String {
        if self.color {
            label.dimmed().to_string()
        } else {
            label.to_string()
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("WIR{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
