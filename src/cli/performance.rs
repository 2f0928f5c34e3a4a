//! Performance-calculation workflow.

use anyhow::Result;
use dialoguer::{Input, theme::ColorfulTheme};
use kadry::{Department, PerformanceLevel, ProjectStats, domain::Assignment};

use super::{App, choose, terminal::Colorize};

pub(crate) fn calculate(app: &mut App) -> Result<()> {
    println!("\n=== Employee performance calculation ===");

    let employees: Vec<(String, String, String)> = app
        .users
        .employees()
        .iter()
        .map(|user| {
            (
                user.username().to_string(),
                user.fullname().to_string(),
                user.department().to_string(),
            )
        })
        .collect();
    if employees.is_empty() {
        println!("No employees to rate.");
        return Ok(());
    }

    let items: Vec<String> = employees
        .iter()
        .map(|(username, fullname, department)| {
            let score = app.config.performance_score(username);
            let current = if score >= 0.0 {
                format!("{score:.2}/100")
            } else {
                "not rated".to_string()
            };
            format!("{fullname} — {department} — {current}")
        })
        .collect();
    let Some(index) = choose("Rate which employee?", &items)? else {
        println!("Cancelled.");
        return Ok(());
    };
    let (username, fullname, department) = employees[index].clone();

    let metric = Department::classify(&department).metric_name();
    println!("Employee: {fullname} ({username}), department: {department}");
    println!("Specialized metric: {metric}");

    let projects = app.projects.projects_for_user(&username);
    if projects.is_empty() {
        println!("The employee takes part in no projects.");
        println!("Performance: n/a (insufficient data).");
        return Ok(());
    }
    let assignments: Vec<&Assignment> = app.projects.assignments().iter().collect();
    let stats = ProjectStats::collect(&projects, &assignments, &username);

    println!("\n--- Project analysis ---");
    println!("Projects total:        {}", stats.total);
    println!("Active projects:       {}", stats.active);
    println!("Completed projects:    {}", stats.completed);
    println!("Leadership roles:      {}", stats.leadership);

    let department_score = prompt_score(&format!("{metric} score (0-100)"))?;
    let teamwork_score = prompt_score("Teamwork score (0-100)")?;
    let tasks_score = stats.tasks_score();

    println!("\n--- Weights for '{department}' ---");
    println!("{metric}: {}%", app.config.department_weight(&department));
    println!("Teamwork: {}%", app.config.weights().teamwork);
    println!("Completed tasks: {}%", app.config.weights().tasks);
    if !app.config.validate_department(&department) {
        println!(
            "{}",
            format!(
                "Warning: the weights for '{department}' do not sum to 100%. \
                 Adjust them in the administrator menu."
            )
            .warning()
        );
    }

    println!("\n--- Results ---");
    println!("{metric}: {department_score:.2}/100");
    println!("Teamwork: {teamwork_score:.2}/100");
    println!(
        "Completed tasks: {tasks_score:.2}/100 (derived from {} projects)",
        stats.total
    );

    let score =
        app.config
            .calculate_performance(&department, department_score, teamwork_score, tasks_score);
    let score = (score * 100.0).round() / 100.0;
    app.config.save_performance_score(&username, score);

    let level = PerformanceLevel::from_score(score);
    println!("{}", format!("\nOverall score: {score:.2}/100 — saved.").success());
    println!("Level: {}", level.label());
    println!("Recommendation: {}", level.recommendation());

    Ok(())
}

fn prompt_score(prompt: &str) -> Result<f64> {
    let value: f64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|value: &f64| {
            if (0.0..=100.0).contains(value) {
                Ok(())
            } else {
                Err("the score must be between 0 and 100")
            }
        })
        .interact_text()?;
    Ok(value)
}
