//! Output formatting utilities

use chaos_lib::{DispatchReport, UnitRef};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row of the pod table
#[derive(Tabled, Serialize)]
pub struct PodRow {
    #[tabled(rename = "Namespace")]
    pub namespace: String,
    #[tabled(rename = "Pod")]
    pub name: String,
    #[tabled(rename = "Node")]
    pub node: String,
    #[tabled(rename = "Age")]
    pub age: String,
}

impl From<&UnitRef> for PodRow {
    fn from(unit: &UnitRef) -> Self {
        Self {
            namespace: unit.namespace.clone(),
            name: unit.name.clone(),
            node: if unit.is_scheduled() {
                unit.node_name.clone()
            } else {
                "<none>".to_string()
            },
            age: unit
                .creation_timestamp
                .map(|ts| format_age(chrono::Utc::now() - ts))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Row of a dispatch outcome table
#[derive(Tabled, Serialize)]
pub struct OutcomeRow {
    #[tabled(rename = "Pod")]
    pub pod: String,
    #[tabled(rename = "Node")]
    pub node: String,
    #[tabled(rename = "Result")]
    pub result: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    action: &'a str,
    succeeded: Vec<&'a UnitRef>,
    companions: &'a [String],
    failed: Vec<FailureJson<'a>>,
}

#[derive(Serialize)]
struct FailureJson<'a> {
    pod: &'a UnitRef,
    error: String,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No pods matched".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
    }
}

/// Print the pods a selection picked
pub fn print_units(units: &[UnitRef], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<PodRow> = units.iter().map(PodRow::from).collect();
            print_table(&rows, format);
        }
        OutputFormat::Json => print_json(&units),
    }
}

/// Print what a dispatch run did to every pod
pub fn print_report(report: &DispatchReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ReportJson {
            action: report.action.as_str(),
            succeeded: report.succeeded.iter().collect(),
            companions: &report.companions,
            failed: report
                .failed
                .iter()
                .map(|f| FailureJson {
                    pod: &f.unit,
                    error: f.error.to_string(),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            let mut rows: Vec<OutcomeRow> = report
                .succeeded
                .iter()
                .enumerate()
                .map(|(i, unit)| OutcomeRow {
                    pod: unit.to_string(),
                    node: unit.node_name.clone(),
                    result: color_status("ok"),
                    detail: report.companions.get(i).cloned().unwrap_or_default(),
                })
                .collect();
            rows.extend(report.failed.iter().map(|f| OutcomeRow {
                pod: f.unit.to_string(),
                node: f.unit.node_name.clone(),
                result: color_status("failed"),
                detail: f.error.to_string(),
            }));
            print_table(&rows, format);

            let summary = format!(
                "{}: {} of {} pods disrupted",
                report.action,
                report.succeeded.len(),
                report.attempted()
            );
            if report.is_success() {
                print_success(&summary);
            } else {
                print_warning(&summary);
            }
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a pod age the way kubectl does (largest unit only)
pub fn format_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);
    if secs >= 86_400 {
        format!("{}d", secs / 86_400)
    } else if secs >= 3_600 {
        format!("{}h", secs / 3_600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "ok" | "healthy" => status.green().to_string(),
        "dry-run" => status.yellow().to_string(),
        "failed" | "unhealthy" | "not found" => status.red().to_string(),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(42)), "42s");
        assert_eq!(format_age(Duration::seconds(150)), "2m");
        assert_eq!(format_age(Duration::hours(5)), "5h");
        assert_eq!(format_age(Duration::days(3)), "3d");
        assert_eq!(format_age(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_pod_row_for_unscheduled_pod() {
        let row = PodRow::from(&UnitRef::new("pending", "default"));
        assert_eq!(row.node, "<none>");
        assert_eq!(row.age, "-");
    }
}
