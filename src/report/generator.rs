use crate::domain::{format_time, Task};
use crate::persistence::{atomic_write, ensure_data_dir};
use crate::report::metrics::{tag_usage, time_by_category, AchievementSet, Metrics};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Build the Markdown statistics report
pub fn build_report(
    tasks: &[Task],
    metrics: &Metrics,
    achievements: &AchievementSet,
    date: NaiveDate,
) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Productivity Report - {}\n\n", date));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Tasks:** {} (Active: {}, Completed: {}, Archived: {})\n",
        metrics.total_count, metrics.active_count, metrics.completed_count, metrics.archived_count
    ));
    report.push_str(&format!("- **Completion:** {}%\n", metrics.completion_pct));
    report.push_str(&format!("- **Time Tracked:** {}\n", format_time(metrics.total_time_spent)));
    report.push_str(&format!("- **Starred:** {}\n", metrics.starred_count));
    report.push_str(&format!(
        "- **Productivity Score:** {}/100\n\n",
        metrics.productivity_score
    ));

    // Achievements
    report.push_str("## Achievements\n\n");
    if achievements.is_empty() {
        report.push_str("_None unlocked yet._\n\n");
    } else {
        for achievement in achievements.iter() {
            report.push_str(&format!("- {}\n", achievement.title()));
        }
        report.push('\n');
    }

    // Time per category
    let by_category = time_by_category(tasks);
    if !by_category.is_empty() {
        report.push_str("## Time by Category\n\n");
        report.push_str("| Category | Time |\n|---|---|\n");
        for (category, seconds) in &by_category {
            report.push_str(&format!("| {} | {} |\n", category.name(), format_time(*seconds)));
        }
        report.push('\n');
    }

    // Tags
    let tags = tag_usage(tasks);
    if !tags.is_empty() {
        report.push_str("## Tags\n\n");
        report.push_str("| Tag | Tasks | Time |\n|---|---|---|\n");
        for (tag, (count, seconds)) in &tags {
            report.push_str(&format!("| {} | {} | {} |\n", tag, count, format_time(*seconds)));
        }
        report.push('\n');
    }

    // Top tasks by tracked time
    let mut by_time: Vec<&Task> = tasks.iter().filter(|t| t.time_spent > 0).collect();
    by_time.sort_by(|a, b| b.time_spent.cmp(&a.time_spent));
    if !by_time.is_empty() {
        report.push_str("## Most Time Spent\n\n");
        for task in by_time.iter().take(5) {
            let status = if task.completed { "x" } else { " " };
            report.push_str(&format!(
                "- [{}] {} ({})\n",
                status,
                task.text,
                task.elapsed_formatted()
            ));
        }
        report.push('\n');
    }

    report
}

/// Write a report, defaulting to <data-dir>/report-YYYY-MM-DD.md
pub fn write_report(content: &str, date: NaiveDate, output_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match output_path {
        Some(path) => path,
        None => ensure_data_dir()?.join(format!("report-{}.md", date.format("%Y-%m-%d"))),
    };

    atomic_write(&path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}
