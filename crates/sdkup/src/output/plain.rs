use sdkup_analysis::{ReleaseAnalysis, UpgradeAnalysis};
use sdkup_core::ChangeItem;
use sdkup_operations::operations::{ReleaseSummary, VersionCheckOutput};
use sdkup_operations::{StageStatus, UsageSummary, WorkflowReport};

pub(crate) struct PlainTextFormatter;

impl PlainTextFormatter {
    fn format_list(output: &mut String, title: &str, items: &[String]) {
        if !items.is_empty() {
            output.push_str(&format!("\n{title}:\n"));
            for item in items {
                output.push_str(&format!("  - {item}\n"));
            }
        }
    }

    fn format_changes(output: &mut String, changes: &[ChangeItem]) {
        if !changes.is_empty() {
            output.push_str("\nBreaking changes:\n");
            for change in changes {
                output.push_str(&format!(
                    "  - [{} / {}] {}\n",
                    change.change_type, change.affected_area, change.description
                ));
            }
        }
    }

    pub(crate) fn format_version_check(output: &VersionCheckOutput) -> String {
        let mut text = format!(
            "{}: {} -> {} ({})\n",
            output.package, output.current_version, output.latest_version, output.update_type
        );
        if output.has_update {
            text.push_str("Update available\n");
        } else {
            text.push_str("Up to date\n");
        }
        Self::format_list(&mut text, "Newer releases", &output.newer_versions);
        text
    }

    pub(crate) fn format_upgrade(analysis: &UpgradeAnalysis, usage: &UsageSummary) -> String {
        let mut output = format!(
            "Upgrade {} -> {}\nRisk level: {}\nReleases to apply: {}\nBreaking changes: {}\n",
            analysis.current_version,
            analysis.target_version,
            analysis.overall_risk_level,
            analysis.releases_to_apply,
            analysis.total_breaking_changes,
        );

        Self::format_changes(&mut output, &analysis.breaking_changes);
        let deprecations: Vec<String> = analysis
            .deprecations
            .iter()
            .map(|d| d.description.clone())
            .collect();
        Self::format_list(&mut output, "Deprecations", &deprecations);
        Self::format_list(&mut output, "Recommendations", &analysis.recommendations);
        Self::format_list(&mut output, "Skipped releases", &analysis.skipped_releases);

        output.push_str(&format!(
            "\nSDK usage: {} import(s) in {} file(s)\n",
            usage.total_usages, usage.total_files
        ));
        for (label, entries) in [
            ("models", &usage.model_imports),
            ("agent", &usage.agent_imports),
            ("tools", &usage.tool_imports),
            ("other", &usage.other_imports),
        ] {
            if !entries.is_empty() {
                output.push_str(&format!("  {label}: {}\n", entries.len()));
            }
        }
        output
    }

    pub(crate) fn format_release(release: &ReleaseAnalysis) -> String {
        let mut output = format!("{} {}\n", release.tag, release.name);
        if let Some(published_at) = release.published_at {
            output.push_str(&format!("Published: {}\n", published_at.format("%Y-%m-%d")));
        }
        output.push_str(&format!("Risk level: {}\n", release.risk_level));

        Self::format_changes(&mut output, &release.breaking_changes);
        Self::format_list(&mut output, "Features", &release.features);
        Self::format_list(&mut output, "Bug fixes", &release.bug_fixes);
        Self::format_list(&mut output, "Recommendations", &release.recommendations);
        output
    }

    pub(crate) fn format_summary(summary: &ReleaseSummary) -> String {
        if summary.releases.is_empty() {
            return format!("No releases newer than {}.\n", summary.current_version);
        }

        let mut output = format!(
            "{} release(s) newer than {}:\n",
            summary.count, summary.current_version
        );
        for release in &summary.releases {
            let date = release
                .published_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            output.push_str(&format!("  {} {} {date}\n", release.tag, release.name));
        }
        output
    }

    pub(crate) fn format_report(report: &WorkflowReport) -> String {
        let mut output = String::from("Stages:\n");
        for record in &report.stages {
            let marker = match record.status {
                StageStatus::Completed => "✓",
                StageStatus::Skipped => "-",
                StageStatus::Failed => "✗",
            };
            output.push_str(&format!("  {marker} {}", record.stage));
            if let Some(detail) = &record.detail {
                output.push_str(&format!(": {detail}"));
            }
            output.push('\n');
        }

        if let Some(code_update) = &report.code_update {
            let fixes: Vec<String> = code_update
                .fixes_applied
                .iter()
                .map(|f| format!("{}: {}", f.file.display(), f.change))
                .collect();
            Self::format_list(&mut output, "Fixes applied", &fixes);

            let manual: Vec<String> = code_update
                .manual_review_needed
                .iter()
                .map(|m| format!("{}: {}", m.file.display(), m.change))
                .collect();
            Self::format_list(&mut output, "Needs manual review", &manual);
        }

        if let Some(pr) = &report.pull_request {
            output.push_str(&format!("\nPull request #{}: {}\n", pr.number, pr.url));
            if pr.auto_merge_enabled {
                output.push_str("Auto-merge enabled\n");
            }
            Self::format_list(&mut output, "Warnings", &pr.warnings);
        }

        Self::format_list(&mut output, "Errors", &report.errors);
        output.push_str(if report.success {
            "\nUpdate succeeded\n"
        } else {
            "\nUpdate failed\n"
        });
        output
    }
}
