//! Projects and employee-to-project assignments.

use chrono::Local;

/// Role label given to a project member when none is specified.
pub const DEFAULT_ASSIGNMENT_ROLE: &str = "Участник";

/// Timestamp format used for creation and assignment dates.
///
/// Lexicographic order on these strings equals chronological order, which is
/// what the date sort relies on.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn now_string() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// A project.
///
/// The name is the unique key. Status is free text; by convention one of
/// "активный", "завершенный", "приостановленный" or "планируется".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    description: String,
    status: String,
    created_date: String,
}

impl Project {
    /// Create a project, stamping the creation date with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: status.into(),
            created_date: now_string(),
        }
    }

    /// Reconstruct a project with an already-stored creation date.
    #[must_use]
    pub fn with_created_date(
        name: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        created_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: status.into(),
            created_date: created_date.into(),
        }
    }

    /// The unique project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-text project status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// When the project was created, as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn created_date(&self) -> &str {
        &self.created_date
    }

    /// Replace the status.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

/// A record linking one user to one project.
///
/// The relationship key is the (username, project name) pair, although
/// nothing prevents duplicate pairs from accumulating; operations on
/// assignments act on the first matching record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    username: String,
    project_name: String,
    role: String,
    assigned_date: String,
}

impl Assignment {
    /// Create an assignment, stamping the assignment date with the current
    /// time.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        project_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            project_name: project_name.into(),
            role: role.into(),
            assigned_date: now_string(),
        }
    }

    /// Reconstruct an assignment with an already-stored assignment date.
    #[must_use]
    pub fn with_assigned_date(
        username: impl Into<String>,
        project_name: impl Into<String>,
        role: impl Into<String>,
        assigned_date: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            project_name: project_name.into(),
            role: role.into(),
            assigned_date: assigned_date.into(),
        }
    }

    /// Login name of the assigned user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Name of the project the user is assigned to.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Free-text role label within the project.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// When the assignment was made, as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn assigned_date(&self) -> &str {
        &self.assigned_date
    }

    /// Replace the role label.
    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_is_stamped_with_a_sortable_date() {
        let project = Project::new("Atlas", "Internal portal", "активный");
        // YYYY-MM-DD HH:MM:SS is exactly 19 characters.
        assert_eq!(project.created_date().len(), 19);
        assert_eq!(project.created_date().as_bytes()[4], b'-');
        assert_eq!(project.created_date().as_bytes()[10], b' ');
    }

    #[test]
    fn stored_dates_are_preserved() {
        let project = Project::with_created_date("Atlas", "d", "s", "2024-01-05 10:00:00");
        assert_eq!(project.created_date(), "2024-01-05 10:00:00");

        let assignment =
            Assignment::with_assigned_date("ivanov", "Atlas", "Участник", "2024-02-01 09:30:00");
        assert_eq!(assignment.assigned_date(), "2024-02-01 09:30:00");
    }
}
