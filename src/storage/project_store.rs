//! The project store.
//!
//! Owns projects and the many-to-many employee-to-project assignments, each
//! in its own backing file. Deleting a project cascades over its assignments;
//! deleting a user does not. That cleanup belongs to the caller.

use std::path::PathBuf;

use crate::domain::{Assignment, Project};

use super::{EMPLOYEE_PROJECTS_FILE, PROJECTS_FILE, record};

/// File-backed store of projects and assignments.
pub struct ProjectStore {
    dir: PathBuf,
    projects: Vec<Project>,
    assignments: Vec<Assignment>,
}

impl ProjectStore {
    /// Open the store over the given data directory, loading both files into
    /// memory.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            dir: dir.into(),
            projects: Vec::new(),
            assignments: Vec::new(),
        };
        store.load();
        store
    }

    /// Reload both files from disk, discarding in-memory state.
    pub fn load(&mut self) {
        self.projects = record::load_records(&self.dir.join(PROJECTS_FILE));
        self.assignments = record::load_records(&self.dir.join(EMPLOYEE_PROJECTS_FILE));
    }

    /// Add a project. Fails on an empty name or a name already in use.
    pub fn add_project(&mut self, project: Project) -> bool {
        if project.name().is_empty() || self.project(project.name()).is_some() {
            return false;
        }
        self.projects.push(project);
        self.persist_projects();
        true
    }

    /// Remove a project and every assignment referencing it.
    pub fn remove_project(&mut self, name: &str) -> bool {
        let Some(index) = self.projects.iter().position(|p| p.name() == name) else {
            return false;
        };
        self.projects.remove(index);
        self.assignments.retain(|a| a.project_name() != name);
        self.persist_projects();
        self.persist_assignments();
        true
    }

    /// Partially update a project.
    ///
    /// An empty `status` or `description` means "leave unchanged", not "set
    /// to empty": the empty string is the sentinel for an omitted argument.
    pub fn update_project(&mut self, name: &str, status: &str, description: &str) -> bool {
        let Some(project) = self.projects.iter_mut().find(|p| p.name() == name) else {
            return false;
        };
        if !status.is_empty() {
            project.set_status(status);
        }
        if !description.is_empty() {
            project.set_description(description);
        }
        self.persist_projects();
        true
    }

    /// Look up a project by name.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    /// Assign an employee to a project.
    ///
    /// Fails only when the project does not exist. Deliberately permissive
    /// beyond that: the username is not checked against the user store, and an
    /// already-assigned pair is appended again rather than rejected.
    pub fn assign_employee(&mut self, username: &str, project_name: &str, role: &str) -> bool {
        if self.project(project_name).is_none() {
            return false;
        }
        self.assignments
            .push(Assignment::new(username, project_name, role));
        self.persist_assignments();
        true
    }

    /// Remove the first assignment matching the (username, project) pair.
    pub fn remove_employee_from_project(&mut self, username: &str, project_name: &str) -> bool {
        let Some(index) = self
            .assignments
            .iter()
            .position(|a| a.username() == username && a.project_name() == project_name)
        else {
            return false;
        };
        self.assignments.remove(index);
        self.persist_assignments();
        true
    }

    /// Change the role label on the first assignment matching the
    /// (username, project) pair.
    pub fn update_employee_role(
        &mut self,
        username: &str,
        project_name: &str,
        new_role: &str,
    ) -> bool {
        let Some(assignment) = self
            .assignments
            .iter_mut()
            .find(|a| a.username() == username && a.project_name() == project_name)
        else {
            return false;
        };
        assignment.set_role(new_role);
        self.persist_assignments();
        true
    }

    /// Every project, in load order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Every assignment, in load order.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The projects a user is assigned to.
    ///
    /// Assignments pointing at deleted projects are silently skipped; a
    /// duplicate assignment yields the project once per record.
    #[must_use]
    pub fn projects_for_user(&self, username: &str) -> Vec<&Project> {
        self.assignments
            .iter()
            .filter(|a| a.username() == username)
            .filter_map(|a| self.project(a.project_name()))
            .collect()
    }

    /// The assignments referencing a project.
    #[must_use]
    pub fn assignments_for_project(&self, project_name: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.project_name() == project_name)
            .collect()
    }

    /// The assignments referencing a user.
    #[must_use]
    pub fn assignments_for_user(&self, username: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.username() == username)
            .collect()
    }

    /// Case-insensitive substring search over project names.
    #[must_use]
    pub fn search_by_name(&self, keyword: &str) -> Vec<&Project> {
        let keyword = keyword.to_lowercase();
        self.projects
            .iter()
            .filter(|p| p.name().to_lowercase().contains(&keyword))
            .collect()
    }

    /// Projects whose status matches exactly.
    #[must_use]
    pub fn filter_by_status(&self, status: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.status() == status)
            .collect()
    }

    /// Projects sorted by name.
    #[must_use]
    pub fn sorted_by_name(&self, ascending: bool) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().collect();
        projects.sort_by(|a, b| {
            let ordering = a.name().cmp(b.name());
            if ascending { ordering } else { ordering.reverse() }
        });
        projects
    }

    /// Projects sorted by creation date.
    ///
    /// Dates are stored as `YYYY-MM-DD HH:MM:SS`, so the lexicographic order
    /// used here is chronological.
    #[must_use]
    pub fn sorted_by_date(&self, ascending: bool) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().collect();
        projects.sort_by(|a, b| {
            let ordering = a.created_date().cmp(b.created_date());
            if ascending { ordering } else { ordering.reverse() }
        });
        projects
    }

    fn persist_projects(&self) {
        let path = self.dir.join(PROJECTS_FILE);
        if let Err(error) = record::save_records(&path, &self.projects) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }

    fn persist_assignments(&self) {
        let path = self.dir.join(EMPLOYEE_PROJECTS_FILE);
        if let Err(error) = record::save_records(&path, &self.assignments) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }
}
