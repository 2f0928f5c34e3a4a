//! Employee session.

use anyhow::Result;
use dialoguer::{Select, theme::ColorfulTheme};
use kadry::{PerformanceLevel, domain::DEFAULT_ASSIGNMENT_ROLE};

use super::{App, hr, report, terminal::Colorize};

pub(crate) fn session(app: &mut App, username: &str) -> Result<()> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Employee menu")
            .items(&[
                "My profile",
                "My projects",
                "My report",
                "My performance score",
                "My rating",
                "Sign out",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => hr::show_profile(app, username),
            1 => my_projects(app, username),
            2 => report::view_latest(&app.data_dir, username),
            3 => my_score(app, username),
            4 => my_rating(app, username),
            _ => {
                println!("Signed out.");
                return Ok(());
            }
        }
    }
}

fn my_projects(app: &App, username: &str) {
    let projects = app.projects.projects_for_user(username);
    if projects.is_empty() {
        println!("You take part in no projects.");
        return;
    }

    println!("\n--- Your projects ({}) ---", projects.len());
    for (index, project) in projects.iter().enumerate() {
        let role = app
            .projects
            .assignments()
            .iter()
            .find(|a| a.username() == username && a.project_name() == project.name())
            .map_or(DEFAULT_ASSIGNMENT_ROLE, |a| a.role());
        println!(
            "{}) {}\n   Description: {}\n   Status: {}\n   Your role: {role}\n   Created: {}\n",
            index + 1,
            project.name(),
            project.description(),
            project.status(),
            project.created_date()
        );
    }
}

fn my_score(app: &App, username: &str) {
    println!("\n=== Your performance score ===");
    if app.config.has_performance_score(username) {
        let score = app.config.performance_score(username);
        let level = PerformanceLevel::from_score(score);
        println!("Current score: {score:.1}/100");
        println!("Level: {}", level.label());
    } else {
        println!("Your performance has not been rated yet.");
        println!("Ask an HR manager to run an evaluation.");
    }
}

#[allow(clippy::cast_precision_loss)]
fn my_rating(app: &App, username: &str) {
    let Some(user) = app.users.find_by_username(username) else {
        println!("{}", "Profile not found.".warning());
        return;
    };

    println!("\n=== My rating ===");
    println!("Employee: {}", user.fullname());
    println!("Login: {}", user.username());
    println!("Department: {}", user.department());

    let (position, total) = app.users.employee_rank(username, &app.config);
    let rating = app.config.performance_score(username);

    if rating < 0.0 {
        println!("\nYour performance has not been rated yet.");
        println!("Ask an HR manager to run an evaluation.");
        return;
    }

    println!("\nPerformance score: {rating:.2}/100");
    if position > 0 {
        let percentile = 100.0 - ((position - 1) as f64 / total as f64) * 100.0;
        println!("Rating position: {position}/{total}");
        println!("Percentile: {percentile:.1}%");
        println!("Level: {}", PerformanceLevel::from_score(rating).label());

        let position = position as f64;
        let total = total as f64;
        let message = if position <= 1.0 {
            "You hold FIRST place in the rating. Congratulations!"
        } else if position <= 3.0 {
            "You are in the top 3. Excellent result!"
        } else if position <= total * 0.1 {
            "You are in the top 10% of the company."
        } else if position <= total * 0.25 {
            "You are in the best quarter of employees."
        } else if position <= total * 0.5 {
            "Your results are above the median."
        } else {
            "There is room to grow. Keep at it!"
        };
        println!("{}", message.info());
    }
}
