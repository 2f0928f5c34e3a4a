//! Flat-file persistence.
//!
//! Each store owns a data directory and keeps its whole record set in
//! memory. Files are rewritten in full after every mutation; there is no
//! incremental update and no cross-file transaction. A failed write is
//! logged and the in-memory state keeps the change, so memory and disk can
//! diverge until the next successful save.

pub mod record;

mod project_store;
mod system_config;
mod user_store;

pub use project_store::ProjectStore;
pub use record::Record;
pub use system_config::{SystemConfig, WeightField};
pub use user_store::UserStore;

pub(crate) const USERS_FILE: &str = "users.txt";
pub(crate) const HR_USERS_FILE: &str = "hr_users.txt";
pub(crate) const ADMIN_USERS_FILE: &str = "admin_users.txt";
pub(crate) const PROJECTS_FILE: &str = "projects.txt";
pub(crate) const EMPLOYEE_PROJECTS_FILE: &str = "employee_projects.txt";
pub(crate) const CONFIG_FILE: &str = "config.txt";
pub(crate) const PERFORMANCE_SCORES_FILE: &str = "performance_scores.txt";
