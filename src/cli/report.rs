//! Employee report rendering and the `HR_REPORT_*` files.

use std::{fs, path::Path};

use anyhow::Result;
use chrono::Local;
use kadry::{
    PerformanceLevel, ProjectStats,
    domain::{Assignment, DEFAULT_ASSIGNMENT_ROLE, scoring},
};

use super::{
    App,
    terminal::{Colorize, center, format_cell, rule},
};

const WIDTH: usize = 80;
const MAX_DETAIL_ROWS: usize = 10;
const MAX_VIEW_LINES: usize = 100;

struct DetailRow {
    name: String,
    status: String,
    role: String,
    assigned: String,
}

/// Build, print and persist a detailed report for one employee.
///
/// Older `HR_REPORT_<username>_*.txt` files are deleted first, so at most one
/// report per employee exists at a time.
pub(crate) fn generate(app: &mut App, username: &str) -> Result<()> {
    let Some(user) = app.users.employee(username) else {
        println!("{}", "Employee not found.".warning());
        return Ok(());
    };
    let fullname = user.fullname().to_string();
    let department = user.department().to_string();

    let projects = app.projects.projects_for_user(username);
    let assignments: Vec<&Assignment> = app.projects.assignments().iter().collect();
    let stats = ProjectStats::collect(&projects, &assignments, username);

    let details: Vec<DetailRow> = projects
        .iter()
        .map(|project| {
            let assignment = assignments
                .iter()
                .find(|a| a.username() == username && a.project_name() == project.name());
            DetailRow {
                name: project.name().to_string(),
                status: project.status().to_string(),
                role: assignment.map_or(DEFAULT_ASSIGNMENT_ROLE, |a| a.role()).to_string(),
                assigned: assignment.map_or("", |a| a.assigned_date()).to_string(),
            }
        })
        .collect();

    let score = app
        .config
        .has_performance_score(username)
        .then(|| app.config.performance_score(username));
    let recommendations = scoring::recommendations(&stats);

    let content = render(&fullname, &department, stats, &details, score, &recommendations);
    println!("{content}");

    remove_old_reports(&app.data_dir, username);

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let filename = format!("HR_REPORT_{username}_{timestamp}.txt");
    let path = app.data_dir.join(&filename);
    match fs::write(&path, &content) {
        Ok(()) => println!("{}", format!("Report saved to '{filename}'.").success()),
        Err(error) => {
            tracing::error!("failed to write {}: {error}", path.display());
            println!("{}", "Failed to save the report file.".warning());
        }
    }
    Ok(())
}

/// Show the newest saved report for `username`, up to the first
/// [`MAX_VIEW_LINES`] lines.
pub(crate) fn view_latest(dir: &Path, username: &str) {
    let Some(filename) = report_files(dir, username).into_iter().max() else {
        println!("No report has been generated for you yet; ask an HR manager.");
        return;
    };

    println!("{}", rule('=', WIDTH));
    println!("|{}|", center(&format!("YOUR HR REPORT: {filename}"), WIDTH - 2));
    println!("{}", rule('=', WIDTH));

    match fs::read_to_string(dir.join(&filename)) {
        Ok(content) => {
            let mut shown = 0;
            for line in content.lines().take(MAX_VIEW_LINES) {
                println!("{line}");
                shown += 1;
            }
            if shown == MAX_VIEW_LINES {
                println!("{}", rule('.', WIDTH));
                println!("Showing the first {MAX_VIEW_LINES} lines of the report.");
            }
        }
        Err(error) => {
            tracing::error!("failed to read report {filename}: {error}");
            println!("{}", "Failed to open the report file.".warning());
        }
    }
    println!("{}", rule('=', WIDTH));
}

fn report_files(dir: &Path, username: &str) -> Vec<String> {
    let prefix = format!("HR_REPORT_{username}_");
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".txt"))
        .collect()
}

fn remove_old_reports(dir: &Path, username: &str) {
    for name in report_files(dir, username) {
        match fs::remove_file(dir.join(&name)) {
            Ok(()) => println!("Removed old report '{name}'."),
            Err(error) => tracing::warn!("failed to remove old report {name}: {error}"),
        }
    }
}

fn boxed(text: &str) -> String {
    format!("|{}|", center(text, WIDTH - 2))
}

fn labeled(label: &str, value: &str) -> String {
    format!(
        "| {} | {} |",
        format_cell(label, 25),
        format_cell(value, WIDTH - 32)
    )
}

fn detail_row(name: &str, status: &str, role: &str, date: &str) -> String {
    format!(
        "| {} | {} | {} | {} |",
        format_cell(name, 22),
        format_cell(status, 12),
        format_cell(role, 14),
        format_cell(date, 19)
    )
}

#[allow(clippy::cast_precision_loss)]
fn render(
    fullname: &str,
    department: &str,
    stats: ProjectStats,
    details: &[DetailRow],
    score: Option<f64>,
    recommendations: &[&str],
) -> String {
    let mut out = Vec::new();

    out.push(rule('=', WIDTH));
    out.push(boxed("EMPLOYEE REPORT"));
    out.push(rule('=', WIDTH));
    out.push(labeled(
        "Generated:",
        &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    ));
    out.push(labeled("Generated by:", "HR manager"));
    out.push(rule('=', WIDTH));

    out.push(boxed("BASIC INFORMATION"));
    out.push(rule('-', WIDTH));
    out.push(labeled("Full name:", fullname));
    out.push(labeled("Department:", department));
    out.push(rule('=', WIDTH));

    out.push(boxed("PROJECT ACTIVITY"));
    out.push(rule('-', WIDTH));
    out.push(labeled("Projects total:", &stats.total.to_string()));
    out.push(labeled("Active projects:", &stats.active.to_string()));
    out.push(labeled("Completed projects:", &stats.completed.to_string()));
    out.push(labeled("Leadership roles:", &stats.leadership.to_string()));
    if stats.total > 0 {
        let total = stats.total as f64;
        let completion = stats.completed as f64 / total * 100.0;
        let activity = stats.active as f64 / total * 100.0;
        let leadership = stats.leadership as f64 / total * 100.0;
        out.push(labeled("Completion rate:", &format!("{completion:.1}%")));
        out.push(labeled("Activity rate:", &format!("{activity:.1}%")));
        out.push(labeled("Leadership rate:", &format!("{leadership:.1}%")));
    }
    out.push(rule('=', WIDTH));

    if !details.is_empty() {
        out.push(boxed("PROJECT DETAILS"));
        out.push(rule('-', WIDTH));
        out.push(detail_row("Project", "Status", "Role", "Assigned"));
        out.push(rule('-', WIDTH));
        for row in details.iter().take(MAX_DETAIL_ROWS) {
            out.push(detail_row(&row.name, &row.status, &row.role, &row.assigned));
        }
        if details.len() > MAX_DETAIL_ROWS {
            out.push(boxed(&format!(
                "... and {} more projects",
                details.len() - MAX_DETAIL_ROWS
            )));
        }
        out.push(rule('=', WIDTH));
    }

    out.push(boxed("PERFORMANCE"));
    out.push(rule('-', WIDTH));
    if let Some(score) = score {
        out.push(labeled("Current score:", &format!("{score:.2}/100")));
        out.push(labeled(
            "Level:",
            PerformanceLevel::from_score(score).label(),
        ));
    } else {
        out.push(labeled("Current score:", "not calculated"));
        out.push(labeled("", "use 'Calculate performance' to rate the employee"));
    }
    out.push(rule('=', WIDTH));

    out.push(boxed("DEVELOPMENT RECOMMENDATIONS"));
    out.push(rule('-', WIDTH));
    for (index, recommendation) in recommendations.iter().enumerate() {
        out.push(labeled(&format!("{}.", index + 1), recommendation));
    }
    out.push(rule('=', WIDTH));

    out.push(labeled("HR manager signature:", "___________________"));
    out.push(labeled("Date:", "___________________"));
    out.push(rule('=', WIDTH));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_files_match_only_the_named_employee() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("HR_REPORT_ivanov_2024-01-01_10-00-00.txt"), "a").unwrap();
        fs::write(dir.join("HR_REPORT_ivanov_2024-03-01_10-00-00.txt"), "b").unwrap();
        fs::write(dir.join("HR_REPORT_ivanova_2024-02-01_10-00-00.txt"), "c").unwrap();
        fs::write(dir.join("users.txt"), "not a report").unwrap();

        let mut files = report_files(dir, "ivanov");
        files.sort();
        assert_eq!(
            files,
            [
                "HR_REPORT_ivanov_2024-01-01_10-00-00.txt",
                "HR_REPORT_ivanov_2024-03-01_10-00-00.txt",
            ]
        );

        // Lexicographic max is the newest, thanks to the timestamp format.
        assert_eq!(
            report_files(dir, "ivanov").into_iter().max().unwrap(),
            "HR_REPORT_ivanov_2024-03-01_10-00-00.txt"
        );
    }

    #[test]
    fn old_reports_are_removed_per_employee() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("HR_REPORT_ivanov_2024-01-01_10-00-00.txt"), "a").unwrap();
        fs::write(dir.join("HR_REPORT_petrov_2024-01-01_10-00-00.txt"), "b").unwrap();

        remove_old_reports(dir, "ivanov");

        assert!(report_files(dir, "ivanov").is_empty());
        assert_eq!(report_files(dir, "petrov").len(), 1);
    }

    #[test]
    fn rendered_reports_carry_every_section() {
        let stats = ProjectStats {
            total: 2,
            active: 1,
            completed: 1,
            leadership: 1,
        };
        let details = [DetailRow {
            name: "Atlas".to_string(),
            status: "активный".to_string(),
            role: "Руководитель".to_string(),
            assigned: "2024-01-01 10:00:00".to_string(),
        }];
        let recommendations = ["Continue current work"];

        let report = render(
            "Иван Иванов",
            "Разработка",
            stats,
            &details,
            Some(81.0),
            &recommendations,
        );

        for section in [
            "EMPLOYEE REPORT",
            "BASIC INFORMATION",
            "PROJECT ACTIVITY",
            "PROJECT DETAILS",
            "PERFORMANCE",
            "DEVELOPMENT RECOMMENDATIONS",
        ] {
            assert!(report.contains(section), "missing section {section}");
        }
        assert!(report.contains("81.00/100"));
        assert!(report.contains("EXPERIENCED"));
        assert!(report.contains("Completion rate:"));
        // Every rendered line stays inside the 80-column frame.
        assert!(report.lines().all(|line| line.chars().count() == WIDTH));
    }

    #[test]
    fn unrated_employees_render_without_a_score() {
        let report = render("Иван", "QA", ProjectStats::default(), &[], None, &[]);
        assert!(report.contains("not calculated"));
        assert!(!report.contains("/100"));
    }
}
