//! Administrator session.

use anyhow::Result;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use kadry::{SystemConfig, WeightField};

use super::{
    App, choose,
    terminal::{self, Colorize},
};

pub(crate) fn session(app: &mut App, username: &str) -> Result<()> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Administrator menu")
            .items(&[
                "List all users",
                "Approve pending HR requests",
                "Delete a user",
                "Configure scoring weights",
                "Sign out",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => list_all_users(app),
            1 => approve_pending(app)?,
            2 => delete_user(app, username)?,
            3 => configure_weights(app)?,
            _ => {
                println!("Signed out.");
                return Ok(());
            }
        }
    }
}

fn list_all_users(app: &App) {
    let users = app.users.all_users();
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    println!("\n=== Users ({}) ===", users.len());
    let rows: Vec<Vec<String>> = users
        .iter()
        .enumerate()
        .map(|(index, user)| {
            vec![
                (index + 1).to_string(),
                user.username().to_string(),
                user.fullname().to_string(),
                user.department().to_string(),
                user.role().to_string(),
            ]
        })
        .collect();
    terminal::print_table(
        &["#", "Login", "Full name", "Department", "Role"],
        &[4, 18, 25, 18, 10],
        &rows,
    );
}

fn approve_pending(app: &mut App) -> Result<()> {
    let pending: Vec<String> = app
        .users
        .pending_users()
        .iter()
        .map(|user| user.username().to_string())
        .collect();
    if pending.is_empty() {
        println!("No pending HR requests.");
        return Ok(());
    }

    let items: Vec<String> = app
        .users
        .pending_users()
        .iter()
        .map(|user| format!("{} ({})", user.username(), user.fullname()))
        .collect();

    let Some(index) = choose("Approve which request?", &items)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let username = &pending[index];
    if app.users.move_user_to_hr(username) {
        println!(
            "{}",
            format!("{username} is now an HR manager; the record moved to the HR file.").success()
        );
    } else {
        println!("{}", "Failed to promote the user.".warning());
    }
    Ok(())
}

fn delete_user(app: &mut App, current_admin: &str) -> Result<()> {
    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Login to delete")
        .allow_empty(true)
        .interact_text()?;
    let username = username.trim().to_string();
    if username.is_empty() {
        println!("Cancelled.");
        return Ok(());
    }
    if username == current_admin {
        println!("{}", "The signed-in administrator cannot be deleted.".warning());
        return Ok(());
    }

    if app.users.remove_user_by_username(&username) {
        // The user store does not cascade into assignments; that cleanup is
        // this layer's job.
        let orphaned: Vec<String> = app
            .projects
            .assignments_for_user(&username)
            .iter()
            .map(|assignment| assignment.project_name().to_string())
            .collect();
        for project_name in orphaned {
            app.projects
                .remove_employee_from_project(&username, &project_name);
        }
        println!("{}", "User deleted; files updated.".success());
    } else if app.users.remove_hr_user_by_username(&username) {
        println!("{}", "HR user deleted; files updated.".success());
    } else {
        println!("User not found.");
    }
    Ok(())
}

fn configure_weights(app: &mut App) -> Result<()> {
    loop {
        let mut items: Vec<String> = vec!["Show all parameters".to_string()];
        items.extend(WeightField::ALL.iter().map(|field| field.label().to_string()));
        items.push("Back".to_string());

        let picked = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Scoring configuration")
            .items(&items)
            .default(0)
            .interact()?;

        if picked == 0 {
            show_all_parameters(&app.config);
            continue;
        }
        let Some(field) = WeightField::ALL.get(picked - 1).copied() else {
            return Ok(());
        };

        println!("Current {}: {}", field.label(), app.config.weight(field));
        let value: f64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("New value (percent)")
            .validate_with(|value: &f64| {
                if (0.0..=100.0).contains(value) {
                    Ok(())
                } else {
                    Err("the weight must be between 0 and 100")
                }
            })
            .interact_text()?;

        app.config.set_weight(field, value);
        println!("{}", format!("{} set to {value}.", field.label()).success());
    }
}

fn show_all_parameters(config: &SystemConfig) {
    let weights = config.weights();

    println!("\n=== Current scoring parameters ===");
    println!("Shared parameters:");
    println!("  Teamwork weight: {}", weights.teamwork);
    println!("  Completed-tasks weight: {}", weights.tasks);

    println!("Specialized parameters:");
    println!("  Code quality (Development): {}", weights.code_quality);
    println!("  Creativity (Design): {}", weights.design_creativity);
    println!("  Campaign ROI (Marketing): {}", weights.marketing_roi);
    println!("  Sales conversion (Sales): {}", weights.sales_conversion);
    println!(
        "  Customer satisfaction (Support): {}",
        weights.support_satisfaction
    );
    println!("  Bug detection (QA): {}", weights.qa_bug_detection);

    println!("Per-department totals (each should be 100%):");
    for (label, department) in [
        ("Development", "Разработка"),
        ("Design", "Дизайн"),
        ("Marketing", "Маркетинг"),
        ("Sales", "Продажи"),
        ("Support", "Поддержка"),
        ("QA", "QA"),
        ("HR", "HR"),
    ] {
        let total = config.department_weight(department) + weights.teamwork + weights.tasks;
        let line = format!("  {label}: {total}%");
        if config.validate_department(department) {
            println!("{line}");
        } else {
            println!("{}", line.warning());
        }
    }
}
