//! Login and registration flows.

use anyhow::Result;
use chrono::Local;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use kadry::{
    Role, User, UserStore,
    domain::user::{hash_password, verify_password},
};

use super::{App, admin, employee, hr, terminal::Colorize};

/// Logins that cannot be registered through the console.
const RESERVED_LOGINS: [&str; 3] = ["admin", "administrator", "root"];

const MAX_PASSWORD_ATTEMPTS: usize = 3;

const MIN_PASSWORD_LENGTH: usize = 6;

/// Departments offered during registration and employee editing.
pub(crate) const DEPARTMENTS: [&str; 7] = [
    "HR",
    "Разработка",
    "QA",
    "Дизайн",
    "Маркетинг",
    "Продажи",
    "Поддержка",
];

pub(crate) fn login(app: &mut App) -> Result<()> {
    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Login")
        .allow_empty(true)
        .interact_text()?;
    let username = username.trim().to_string();
    if username.is_empty() {
        println!("Empty login, returning to the main menu.");
        return Ok(());
    }

    let Some(user) = app.users.find_by_username(&username) else {
        let register_instead = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Unknown login. Register instead?")
            .default(false)
            .interact()?;
        if register_instead {
            return register_with_login(app, &username);
        }
        return Ok(());
    };

    let role = user.role();
    let stored_hash = user.password_hash().to_string();

    if !attempt_password(&stored_hash)? {
        println!("{}", "Too many failed attempts.".warning());
        return Ok(());
    }

    dispatch(app, &username, role)
}

pub(crate) fn register(app: &mut App) -> Result<()> {
    let login: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Desired login")
        .allow_empty(true)
        .interact_text()?;
    let login = login.trim().to_string();
    if login.is_empty() {
        println!("Empty login, returning to the main menu.");
        return Ok(());
    }
    register_with_login(app, &login)
}

fn register_with_login(app: &mut App, desired_login: &str) -> Result<()> {
    let mut login = desired_login.to_string();
    loop {
        if RESERVED_LOGINS.contains(&login.to_lowercase().as_str()) {
            println!("{}", "This login is reserved by the system.".warning());
        } else if app.users.find_by_username(&login).is_some() {
            println!("Login '{login}' is already taken.");
        } else {
            break;
        }

        let alternative: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Another login (leave empty to cancel)")
            .allow_empty(true)
            .interact_text()?;
        login = alternative.trim().to_string();
        if login.is_empty() {
            println!("Registration cancelled.");
            return Ok(());
        }
    }

    let password_hash = prompt_new_password(&app.users)?;

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
    let fullname = fullname.trim().to_string();

    let department = choose_department()?;

    // Asking for the HR department is a request for the HR role; the account
    // stays PENDING until the administrator approves it.
    let role = if department.eq_ignore_ascii_case("HR") {
        Role::Pending
    } else {
        Role::Employee
    };

    let user = User::new(&login, &password_hash, &fullname, &department, role);
    if !app.users.add_user(user) {
        println!("{}", "Registration failed (login already taken?).".warning());
        return Ok(());
    }

    println!("{}", "Registration successful.".success());
    if role == Role::Pending {
        println!("The HR role requires administrator approval; until then the account works as a regular employee.");
    }

    let sign_in = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Sign in now?")
        .default(true)
        .interact()?;
    if sign_in && attempt_password(&password_hash)? {
        dispatch(app, &login, role)?;
    }

    Ok(())
}

fn dispatch(app: &mut App, username: &str, role: Role) -> Result<()> {
    match role {
        Role::Admin => admin::session(app, username),
        Role::Hr => hr::session(app, username),
        Role::Pending => {
            println!(
                "Your account is awaiting administrator approval for the HR role."
            );
            employee::session(app, username)
        }
        Role::Employee => employee::session(app, username),
    }
}

fn attempt_password(stored_hash: &str) -> Result<bool> {
    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?;

        if verify_password(&password, stored_hash) {
            let now = Local::now().format("%Y-%m-%d %H:%M:%S");
            println!("{}", format!("Authenticated at {now}.").success());
            return Ok(true);
        }
        println!(
            "Wrong password. Attempts left: {}",
            MAX_PASSWORD_ATTEMPTS - attempt
        );
    }
    Ok(false)
}

/// Ask for a new password until it satisfies the policy, returning its hash.
///
/// The policy: at least [`MIN_PASSWORD_LENGTH`] characters, confirmed by
/// retyping, and not in use by any existing account. The last rule is the
/// system-wide password-uniqueness policy; it only works because hashing is
/// deterministic.
pub(crate) fn prompt_new_password(users: &UserStore) -> Result<String> {
    loop {
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            println!("The password must be at least {MIN_PASSWORD_LENGTH} characters long.");
            continue;
        }

        let hash = hash_password(&password);
        if users.is_password_already_used(&hash) {
            println!(
                "{}",
                "This password is already used by another account; pick a different one."
                    .warning()
            );
            continue;
        }

        return Ok(hash);
    }
}

/// Department selector used by registration and employee management.
pub(crate) fn choose_department() -> Result<String> {
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Department")
        .items(&DEPARTMENTS)
        .default(0)
        .interact()?;
    Ok(DEPARTMENTS[picked].to_string())
}
