use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted config key, e.g. `window.bucket_seconds`.
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Serialize)]
struct ValidationReportJson<'a> {
    errors: &'a [ValidationIssue],
    warnings: &'a [ValidationIssue],
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, field: &str, message: String, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message,
            help,
        });
    }

    pub(crate) fn warning(&mut self, field: &str, message: String, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
            help,
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        let json = ValidationReportJson {
            errors: &self.errors,
            warnings: &self.warnings,
        };
        serde_json::to_string_pretty(&json)
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            out.push_str(&format!("{}: {}: {}\n", severity, issue.field, issue.message));
            if let Some(help) = &issue.help {
                out.push_str(&format!("  help: {help}\n"));
            }
        }
        out
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();

        if self.has_violations() {
            out.push_str(&format!(
                "configuration validation failed ({} errors, {} warnings)\n\n",
                self.errors.len(),
                self.warnings.len()
            ));
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let label = match issue.severity {
                Severity::Error => "error".red().bold().to_string(),
                Severity::Warning => "warning".yellow().bold().to_string(),
            };
            out.push_str(&format!(
                "  {}: {} {}\n",
                label,
                issue.field.bold(),
                issue.message
            ));
            if let Some(help) = &issue.help {
                out.push_str(&format!("    help: {help}\n"));
            }
        }

        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", issue.field, issue.message)?;
            first = false;
        }
        Ok(())
    }
}
