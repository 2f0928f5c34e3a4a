//! HR manager session: project and employee management.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use kadry::{Project, Role, User, domain::DEFAULT_ASSIGNMENT_ROLE};

use super::{
    App, auth, choose, performance, report,
    terminal::{self, Colorize},
};

/// Conventional project statuses accepted by the editing flow.
pub(crate) const PROJECT_STATUSES: [&str; 4] =
    ["активный", "завершенный", "приостановленный", "планируется"];

pub(crate) fn session(app: &mut App, username: &str) -> Result<()> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("HR manager menu")
            .items(&[
                "My profile",
                "Manage projects",
                "Manage employees",
                "Sign out",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => show_profile(app, username),
            1 => manage_projects(app)?,
            2 => manage_employees(app)?,
            _ => {
                println!("Signed out.");
                return Ok(());
            }
        }
    }
}

pub(crate) fn show_profile(app: &App, username: &str) {
    let Some(user) = app.users.find_by_username(username) else {
        println!("{}", "Profile not found.".warning());
        return;
    };
    println!("\n---- Profile ----");
    println!("Full name:  {}", user.fullname());
    println!("Department: {}", user.department());
    println!("Role:       {}", user.role());
}

fn manage_projects(app: &mut App) -> Result<()> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Project management")
            .items(&[
                "Add a project",
                "List all projects",
                "Assign an employee to a project",
                "Project details",
                "Edit a project",
                "Delete a project",
                "Search projects",
                "Filter projects by status",
                "Sort projects",
                "Back",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => add_project(app)?,
            1 => list_projects(app),
            2 => assign_employee(app)?,
            3 => project_details(app)?,
            4 => edit_project(app)?,
            5 => delete_project(app)?,
            6 => search_projects(app)?,
            7 => filter_projects(app)?,
            8 => sort_projects(app)?,
            _ => return Ok(()),
        }
    }
}

fn add_project(app: &mut App) -> Result<()> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Project name")
        .allow_empty(true)
        .interact_text()?;
    let name = name.trim().to_string();
    if name.is_empty() {
        println!("The project name must not be empty.");
        return Ok(());
    }

    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description")
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("the description must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let status_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Status")
        .items(&PROJECT_STATUSES)
        .default(0)
        .interact()?;

    if app.projects.add_project(Project::new(
        &name,
        description.trim(),
        PROJECT_STATUSES[status_index],
    )) {
        println!("{}", format!("Project '{name}' added.").success());
    } else {
        println!("{}", "A project with this name already exists.".warning());
    }
    Ok(())
}

fn list_projects(app: &App) {
    let projects: Vec<&Project> = app.projects.projects().iter().collect();
    print_projects_table(&projects);
}

fn print_projects_table(projects: &[&Project]) {
    if projects.is_empty() {
        println!("No projects.");
        return;
    }

    println!("\n=== Projects ({}) ===", projects.len());
    let description_width = if terminal::is_narrow() { 16 } else { 28 };
    let rows: Vec<Vec<String>> = projects
        .iter()
        .enumerate()
        .map(|(index, project)| {
            vec![
                (index + 1).to_string(),
                project.name().to_string(),
                project.description().to_string(),
                project.status().to_string(),
                project.created_date().to_string(),
            ]
        })
        .collect();
    terminal::print_table(
        &["#", "Name", "Description", "Status", "Created"],
        &[4, 22, description_width, 16, 19],
        &rows,
    );
}

/// Pick a project by name; `None` means cancelled or no projects exist.
fn choose_project(app: &App, prompt: &str) -> Result<Option<String>> {
    let names: Vec<String> = app
        .projects
        .projects()
        .iter()
        .map(|project| project.name().to_string())
        .collect();
    if names.is_empty() {
        println!("No projects.");
        return Ok(None);
    }
    Ok(choose(prompt, &names)?.map(|index| names[index].clone()))
}

/// Pick an employee (or pending user) by username; `None` means cancelled.
pub(crate) fn choose_employee(app: &App, prompt: &str) -> Result<Option<String>> {
    let employees: Vec<(String, String)> = app
        .users
        .employees()
        .iter()
        .map(|user| (user.username().to_string(), user.fullname().to_string()))
        .collect();
    if employees.is_empty() {
        println!("No employees.");
        return Ok(None);
    }

    let items: Vec<String> = employees
        .iter()
        .map(|(username, fullname)| format!("{fullname} ({username})"))
        .collect();
    Ok(choose(prompt, &items)?.map(|index| employees[index].0.clone()))
}

fn assign_employee(app: &mut App) -> Result<()> {
    let Some(username) = choose_employee(app, "Assign which employee?")? else {
        return Ok(());
    };
    let Some(project_name) = choose_project(app, "To which project?")? else {
        return Ok(());
    };

    let role: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Role on the project")
        .default(DEFAULT_ASSIGNMENT_ROLE.to_string())
        .interact_text()?;

    if app.projects.assign_employee(&username, &project_name, role.trim()) {
        println!(
            "{}",
            format!("{username} assigned to '{project_name}' as '{}'.", role.trim()).success()
        );
    } else {
        println!("{}", "The project does not exist.".warning());
    }
    Ok(())
}

fn project_details(app: &mut App) -> Result<()> {
    let Some(name) = choose_project(app, "Which project?")? else {
        return Ok(());
    };
    let Some(project) = app.projects.project(&name) else {
        println!("{}", "Project not found.".warning());
        return Ok(());
    };

    println!("\n--- Project ---");
    println!("Name:        {}", project.name());
    println!("Description: {}", project.description());
    println!("Status:      {}", project.status());
    println!("Created:     {}", project.created_date());

    let members = app.projects.assignments_for_project(&name);
    if members.is_empty() {
        println!("No employees on the project.");
        return Ok(());
    }

    println!("Members ({}):", members.len());
    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|assignment| {
            let fullname = app
                .users
                .find_by_username(assignment.username())
                .map_or_else(|| "<deleted>".to_string(), |u| u.fullname().to_string());
            vec![
                fullname,
                assignment.username().to_string(),
                assignment.role().to_string(),
                assignment.assigned_date().to_string(),
            ]
        })
        .collect();
    terminal::print_table(
        &["Full name", "Login", "Role", "Assigned"],
        &[22, 14, 18, 19],
        &rows,
    );
    Ok(())
}

fn edit_project(app: &mut App) -> Result<()> {
    let Some(name) = choose_project(app, "Edit which project?")? else {
        return Ok(());
    };

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What should change?")
        .items(&[
            "Status",
            "Description",
            "A member's role",
            "Cancel",
        ])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            let current = app
                .projects
                .project(&name)
                .map_or_else(String::new, |p| p.status().to_string());
            println!("Current status: {current}");
            let status_index = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("New status")
                .items(&PROJECT_STATUSES)
                .default(0)
                .interact()?;
            if app
                .projects
                .update_project(&name, PROJECT_STATUSES[status_index], "")
            {
                println!("{}", "Status updated.".success());
            } else {
                println!("{}", "Project not found.".warning());
            }
        }
        1 => {
            let description: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("New description (leave empty to keep the current one)")
                .allow_empty(true)
                .interact_text()?;
            let description = description.trim().to_string();
            if description.is_empty() {
                println!("Description unchanged.");
            } else if app.projects.update_project(&name, "", &description) {
                println!("{}", "Description updated.".success());
            } else {
                println!("{}", "Project not found.".warning());
            }
        }
        2 => edit_member_role(app, &name)?,
        _ => {}
    }
    Ok(())
}

fn edit_member_role(app: &mut App, project_name: &str) -> Result<()> {
    let members: Vec<(String, String)> = app
        .projects
        .assignments_for_project(project_name)
        .iter()
        .map(|assignment| {
            (
                assignment.username().to_string(),
                assignment.role().to_string(),
            )
        })
        .collect();
    if members.is_empty() {
        println!("No employees on the project.");
        return Ok(());
    }

    let items: Vec<String> = members
        .iter()
        .map(|(username, role)| format!("{username} — {role}"))
        .collect();
    let Some(index) = choose("Whose role?", &items)? else {
        return Ok(());
    };
    let username = &members[index].0;

    let new_role: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("New role")
        .default(DEFAULT_ASSIGNMENT_ROLE.to_string())
        .interact_text()?;

    if app
        .projects
        .update_employee_role(username, project_name, new_role.trim())
    {
        println!("{}", "Role updated.".success());
    } else {
        println!("{}", "Assignment not found.".warning());
    }
    Ok(())
}

fn delete_project(app: &mut App) -> Result<()> {
    let Some(name) = choose_project(app, "Delete which project?")? else {
        return Ok(());
    };
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Delete '{name}' and all of its assignments?"
        ))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    if app.projects.remove_project(&name) {
        println!("{}", "Project and its assignments removed.".success());
    } else {
        println!("{}", "Project not found.".warning());
    }
    Ok(())
}

fn search_projects(app: &App) -> Result<()> {
    let keyword: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Search keyword")
        .interact_text()?;
    let found = app.projects.search_by_name(keyword.trim());
    print_projects_table(&found);
    Ok(())
}

fn filter_projects(app: &App) -> Result<()> {
    let status_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Status")
        .items(&PROJECT_STATUSES)
        .default(0)
        .interact()?;
    let found = app.projects.filter_by_status(PROJECT_STATUSES[status_index]);
    print_projects_table(&found);
    Ok(())
}

fn sort_projects(app: &App) -> Result<()> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Order")
        .items(&[
            "By name, A to Z",
            "By name, Z to A",
            "By date, oldest first",
            "By date, newest first",
        ])
        .default(0)
        .interact()?;

    let sorted = match choice {
        0 => app.projects.sorted_by_name(true),
        1 => app.projects.sorted_by_name(false),
        2 => app.projects.sorted_by_date(true),
        _ => app.projects.sorted_by_date(false),
    };
    print_projects_table(&sorted);
    Ok(())
}

fn manage_employees(app: &mut App) -> Result<()> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Employee management")
            .items(&[
                "Add an employee",
                "List all employees",
                "Employee details",
                "Edit an employee",
                "Delete an employee",
                "Search employees",
                "Employees sorted by name",
                "Assign an employee to a project",
                "Calculate performance",
                "Employee rating",
                "Generate an employee report",
                "Back",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => add_employee(app)?,
            1 => list_employees(app),
            2 => employee_details(app)?,
            3 => edit_employee(app)?,
            4 => delete_employee(app)?,
            5 => search_employees(app)?,
            6 => employees_sorted_by_name(app),
            7 => assign_employee(app)?,
            8 => performance::calculate(app)?,
            9 => show_rating(app),
            10 => generate_report(app)?,
            _ => return Ok(()),
        }
    }
}

fn add_employee(app: &mut App) -> Result<()> {
    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Login")
        .allow_empty(true)
        .interact_text()?;
    let username = username.trim().to_string();
    if username.is_empty() {
        println!("The login must not be empty.");
        return Ok(());
    }
    if app.users.find_by_username(&username).is_some() {
        println!("{}", "An account with this login already exists.".warning());
        return Ok(());
    }
    if ["admin", "administrator", "root"].contains(&username.to_lowercase().as_str()) {
        println!("{}", "This login is reserved by the system.".warning());
        return Ok(());
    }

    let password_hash = auth::prompt_new_password(&app.users)?;

    let fullname: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Full name")
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("full name must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let department = auth::choose_department()?;

    let user = User::new(
        &username,
        &password_hash,
        fullname.trim(),
        &department,
        Role::Employee,
    );
    if app.users.add_user(user) {
        println!("{}", format!("Employee '{}' added.", fullname.trim()).success());
    } else {
        println!("{}", "Failed to add the employee.".warning());
    }
    Ok(())
}

fn list_employees(app: &App) {
    let employees = app.users.employees();
    if employees.is_empty() {
        println!("No employees.");
        return;
    }

    println!("\n=== Employees ({}) ===", employees.len());
    let rows: Vec<Vec<String>> = employees
        .iter()
        .enumerate()
        .map(|(index, user)| {
            vec![
                (index + 1).to_string(),
                user.fullname().to_string(),
                user.username().to_string(),
                user.department().to_string(),
                user.role().to_string(),
            ]
        })
        .collect();
    terminal::print_table(
        &["#", "Full name", "Login", "Department", "Role"],
        &[4, 25, 14, 16, 10],
        &rows,
    );
}

fn employee_details(app: &mut App) -> Result<()> {
    let Some(username) = choose_employee(app, "Which employee?")? else {
        return Ok(());
    };

    show_profile(app, &username);

    let projects = app.projects.projects_for_user(&username);
    if projects.is_empty() {
        println!("The employee takes part in no projects.");
        return Ok(());
    }

    println!("Projects:");
    for project in projects {
        let role = app
            .projects
            .assignments()
            .iter()
            .find(|a| a.username() == username && a.project_name() == project.name())
            .map_or(DEFAULT_ASSIGNMENT_ROLE, |a| a.role());
        println!(
            "  - {} | status: {} | role: {role}",
            project.name(),
            project.status()
        );
    }
    Ok(())
}

fn edit_employee(app: &mut App) -> Result<()> {
    let Some(username) = choose_employee(app, "Edit which employee?")? else {
        return Ok(());
    };
    let Some(current) = app.users.employee(&username) else {
        println!("{}", "Employee not found.".warning());
        return Ok(());
    };
    let current_fullname = current.fullname().to_string();
    let current_department = current.department().to_string();

    let fullname: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("New full name (leave empty to keep the current one)")
        .allow_empty(true)
        .interact_text()?;
    let fullname = if fullname.trim().is_empty() {
        current_fullname
    } else {
        fullname.trim().to_string()
    };

    let mut departments: Vec<String> = vec![format!("Keep current ({current_department})")];
    departments.extend(auth::DEPARTMENTS.iter().map(ToString::to_string));
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Department")
        .items(&departments)
        .default(0)
        .interact()?;
    let department = if picked == 0 {
        current_department
    } else {
        auth::DEPARTMENTS[picked - 1].to_string()
    };

    if app.users.update_employee(&username, &fullname, &department) {
        println!("{}", "Employee updated.".success());
    } else {
        println!("{}", "Failed to update the employee.".warning());
    }
    Ok(())
}

fn delete_employee(app: &mut App) -> Result<()> {
    let Some(username) = choose_employee(app, "Delete which employee?")? else {
        return Ok(());
    };
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Really delete '{username}'?"))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    // Assignments are cleaned up here, not inside the user store.
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

    if app.users.remove_user_by_username(&username) {
        println!("{}", "Employee deleted.".success());
    } else {
        println!("{}", "Failed to delete the employee.".warning());
    }
    Ok(())
}

fn search_employees(app: &App) -> Result<()> {
    let keyword: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Search keyword (name or login)")
        .interact_text()?;
    let found = app.users.search_employees(keyword.trim());

    if found.is_empty() {
        println!("No employees found.");
        return Ok(());
    }
    println!("\n--- Search results ({}) ---", found.len());
    for user in found {
        println!(
            "{} | login: {} | department: {} | role: {}",
            user.fullname(),
            user.username(),
            user.department(),
            user.role()
        );
    }
    Ok(())
}

fn employees_sorted_by_name(app: &App) {
    let sorted = app.users.employees_sorted_by_name(true);
    if sorted.is_empty() {
        println!("No employees.");
        return;
    }

    println!("\n--- Employees, A to Z ---");
    for user in sorted {
        println!(
            "{} | login: {} | department: {}",
            user.fullname(),
            user.username(),
            user.department()
        );
    }
}

fn show_rating(app: &App) {
    let rated = app.users.employees_sorted_by_rating(&app.config);
    if rated.is_empty() {
        println!("No employees.");
        return;
    }

    println!("\n=== Employee performance rating ===");
    let rows: Vec<Vec<String>> = rated
        .iter()
        .enumerate()
        .map(|(index, (user, score))| {
            let (score_text, level) = if *score >= 0.0 {
                (
                    format!("{score:.2}"),
                    kadry::PerformanceLevel::from_score(*score).label().to_string(),
                )
            } else {
                ("—".to_string(), "NOT RATED".to_string())
            };
            vec![
                (index + 1).to_string(),
                user.fullname().to_string(),
                user.department().to_string(),
                score_text,
                level,
            ]
        })
        .collect();
    terminal::print_table(
        &["#", "Full name", "Department", "Score", "Level"],
        &[4, 25, 16, 8, 18],
        &rows,
    );

    let scores: Vec<f64> = rated
        .iter()
        .filter(|(_, score)| *score >= 0.0)
        .map(|(_, score)| *score)
        .collect();
    println!("Total employees: {}", rated.len());
    println!("Rated: {}", scores.len());
    println!("Not rated: {}", rated.len() - scores.len());
    if !scores.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let best = scores.iter().fold(f64::MIN, |a, &b| a.max(b));
        println!("Average score: {average:.2}");
        println!("Best score: {best:.2}");
    }
}

fn generate_report(app: &mut App) -> Result<()> {
    let Some(username) = choose_employee(app, "Report for which employee?")? else {
        return Ok(());
    };
    report::generate(app, &username)
}
