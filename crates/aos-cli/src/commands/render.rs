//! Terminal and JSON rendering of installation reports

use aos_core::{ActionOutcome, InstallationReport, SyncAction};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Print `report` and turn per-file failures into an error.
pub fn finish(report: &InstallationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }

    if report.has_failures() {
        return Err(CliError::Failures {
            count: report.failures.len(),
        });
    }
    Ok(())
}

fn print_report(report: &InstallationReport) {
    if report.state_corrupt {
        println!(
            "{} Installation state was unreadable; existing files were kept.",
            "WARN".yellow().bold()
        );
    }

    let prefix = if report.applied { "" } else { "[dry-run] Would " };
    for outcome in report.outcomes.iter().filter(|o| o.action.mutates()) {
        println!("   {} {}{}", marker(outcome.action), prefix, describe(outcome));
    }

    if report.changes() == 0 && !report.has_failures() {
        println!(
            "{} Already synchronized. No changes needed.",
            "OK".green().bold()
        );
    } else if report.applied {
        println!("{} {}", "OK".green().bold(), summary(report));
    } else {
        println!("{} {}", "DRY RUN".cyan().bold(), summary(report));
    }

    if !report.requires_merge.is_empty() {
        println!();
        println!("{} Locally edited, upstream changed:", "MERGE".yellow().bold());
        for path in &report.requires_merge {
            println!("   {} {}", "!".yellow(), path.cyan());
        }
        println!("Run {} to see the upstream changes.", "agent-os diff".cyan());
    }

    if !report.retained_deletions.is_empty() {
        println!();
        println!("{} Removed upstream, kept because edited:", "KEPT".yellow().bold());
        for path in &report.retained_deletions {
            println!("   {} {}", "-".yellow(), path.cyan());
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{} Some files could not be synchronized:", "ERROR".red().bold());
        for failure in &report.failures {
            println!("   {} {}: {}", "!".red(), failure.logical_path.cyan(), failure.reason);
        }
    }
}

fn marker(action: SyncAction) -> colored::ColoredString {
    match action {
        SyncAction::Create => "+".green(),
        SyncAction::Overwrite => "~".blue(),
        SyncAction::BackupAndOverwrite => "!".magenta(),
        SyncAction::Delete => "-".red(),
        SyncAction::SkipUnmodified | SyncAction::SkipCustomized => "=".dimmed(),
    }
}

fn describe(outcome: &ActionOutcome) -> String {
    let verb = match outcome.action {
        SyncAction::Create => "create",
        SyncAction::Overwrite => "update",
        SyncAction::BackupAndOverwrite => "back up and replace",
        SyncAction::Delete => "remove",
        SyncAction::SkipUnmodified | SyncAction::SkipCustomized => "keep",
    };
    let layer = outcome
        .layer
        .map(|layer| format!(" ({})", layer))
        .unwrap_or_default();
    match &outcome.backup {
        Some(backup) => format!("{} {}{} -> backup {}", verb, outcome.logical_path, layer, backup),
        None => format!("{} {}{}", verb, outcome.logical_path, layer),
    }
}

fn summary(report: &InstallationReport) -> String {
    format!(
        "{} created, {} updated, {} backed up, {} removed, {} unchanged, {} customized",
        report.count(SyncAction::Create),
        report.count(SyncAction::Overwrite),
        report.count(SyncAction::BackupAndOverwrite),
        report.count(SyncAction::Delete),
        report.count(SyncAction::SkipUnmodified),
        report.count(SyncAction::SkipCustomized),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aos_core::{LayerName, Scope};
    use aos_fs::NormalizedPath;

    fn report(outcomes: Vec<ActionOutcome>) -> InstallationReport {
        InstallationReport::from_outcomes(
            &NormalizedPath::new("/target"),
            Scope::Base,
            true,
            false,
            outcomes,
            Vec::new(),
        )
    }

    #[test]
    fn describe_names_layer_and_backup() {
        let outcome = ActionOutcome {
            logical_path: "standards/a.md".to_string(),
            action: SyncAction::BackupAndOverwrite,
            layer: Some(LayerName::Team),
            removed_upstream: false,
            reconciled: false,
            backup: Some("/target/standards/a.md.backup.20240101000000".to_string()),
        };
        assert_eq!(
            describe(&outcome),
            "back up and replace standards/a.md (team) -> backup /target/standards/a.md.backup.20240101000000"
        );
    }

    #[test]
    fn summary_counts_each_kind() {
        let create = ActionOutcome {
            logical_path: "a.md".to_string(),
            action: SyncAction::Create,
            layer: Some(LayerName::Base),
            removed_upstream: false,
            reconciled: false,
            backup: None,
        };
        assert_eq!(
            summary(&report(vec![create])),
            "1 created, 0 updated, 0 backed up, 0 removed, 0 unchanged, 0 customized"
        );
    }

    #[test]
    fn finish_fails_on_file_failures() {
        let report = InstallationReport::from_outcomes(
            &NormalizedPath::new("/target"),
            Scope::Base,
            true,
            false,
            Vec::new(),
            vec![aos_core::FileFailure::new("a.md", "denied")],
        );
        let err = finish(&report, true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
