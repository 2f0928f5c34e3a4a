//! Pipe-delimited record codec.
//!
//! One record per line, fields joined by `|`, every field trimmed on read.
//! Field values must not themselves contain `|` or a newline; there is no
//! escaping, and a value carrying the delimiter corrupts the line. This is a
//! documented limitation of the format, not something the codec tries to
//! repair.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::domain::{Assignment, Project, Role, User};

use super::user_store::ADMIN_DEPARTMENT;

/// A record type with a pipe-delimited line form.
pub trait Record: Sized {
    /// The minimum number of fields a line must carry to parse. Lines with
    /// fewer fields are skipped by the loader; extra fields are ignored.
    const MIN_FIELDS: usize;

    /// Serialize to a single line, without the trailing newline.
    fn to_line(&self) -> String;

    /// Build the record from already-split, already-trimmed fields.
    ///
    /// The slice is guaranteed to hold at least [`Self::MIN_FIELDS`]
    /// entries.
    fn from_fields(fields: &[&str]) -> Option<Self>;

    /// Parse one line, returning `None` when it does not carry enough
    /// fields or a field fails to parse.
    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Self::from_fields(&fields)
    }
}

/// Load every parseable record from `path`.
///
/// A missing file yields an empty set (it is created by the first save).
/// Blank lines, unreadable lines and lines that fail to parse are skipped;
/// the latter two are logged. No condition here is fatal.
pub(crate) fn load_records<R: Record>(path: &Path) -> Vec<R> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, starting empty", path.display());
            return Vec::new();
        }
        Err(error) => {
            tracing::error!("failed to open {}: {error}", path.display());
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!("skipping unreadable line in {}: {error}", path.display());
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match R::parse(line) {
            Some(record) => records.push(record),
            None => tracing::warn!("skipping malformed record in {}: {line}", path.display()),
        }
    }
    records
}

/// Rewrite `path` with the full record set, one line per record.
pub(crate) fn save_records<'a, R>(
    path: &Path,
    records: impl IntoIterator<Item = &'a R>,
) -> io::Result<()>
where
    R: Record + 'a,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    fs::write(path, out)
}

impl Record for User {
    // username|password_hash|fullname|department|role
    const MIN_FIELDS: usize = 5;

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.username(),
            self.password_hash(),
            self.fullname(),
            self.department(),
            self.role()
        )
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        // Unrecognised role strings degrade to EMPLOYEE rather than dropping
        // the whole record.
        let role = fields[4].parse().unwrap_or(Role::Employee);
        Some(Self::new(fields[0], fields[1], fields[2], fields[3], role))
    }
}

/// The HR-file projection of a [`User`]: four fields, the role implied by
/// the file itself.
#[derive(Debug)]
pub(crate) struct HrUserRecord(pub(crate) User);

impl Record for HrUserRecord {
    // username|password_hash|fullname|department
    const MIN_FIELDS: usize = 4;

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.0.username(),
            self.0.password_hash(),
            self.0.fullname(),
            self.0.department()
        )
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        Some(Self(User::new(
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            Role::Hr,
        )))
    }
}

/// The admin-file projection of a [`User`]: three fields, fixed department
/// and role.
#[derive(Debug)]
pub(crate) struct AdminRecord(pub(crate) User);

impl Record for AdminRecord {
    // username|password_hash|fullname
    const MIN_FIELDS: usize = 3;

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}",
            self.0.username(),
            self.0.password_hash(),
            self.0.fullname()
        )
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        Some(Self(User::new(
            fields[0],
            fields[1],
            fields[2],
            ADMIN_DEPARTMENT,
            Role::Admin,
        )))
    }
}

impl Record for Project {
    // name|description|status|created_date
    const MIN_FIELDS: usize = 4;

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.name(),
            self.description(),
            self.status(),
            self.created_date()
        )
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        Some(Self::with_created_date(
            fields[0], fields[1], fields[2], fields[3],
        ))
    }
}

impl Record for Assignment {
    // username|project_name|role|assigned_date
    const MIN_FIELDS: usize = 4;

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.username(),
            self.project_name(),
            self.role(),
            self.assigned_date()
        )
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        Some(Self::with_assigned_date(
            fields[0], fields[1], fields[2], fields[3],
        ))
    }
}

/// One line of the performance-scores file.
#[derive(Debug, PartialEq)]
pub(crate) struct ScoreRecord {
    pub(crate) username: String,
    pub(crate) score: f64,
}

impl Record for ScoreRecord {
    // username|score
    const MIN_FIELDS: usize = 2;

    fn to_line(&self) -> String {
        format!("{}|{:.2}", self.username, self.score)
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        let score = fields[1].parse().ok()?;
        Some(Self {
            username: fields[0].to_string(),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_round_trips_exactly() {
        let user = User::new("ivanov", "abc123", "Иван Иванов", "Разработка", Role::Pending);
        let parsed = User::parse(&user.to_line()).unwrap();
        assert_eq!(parsed, user);
    }

    #[test]
    fn project_round_trips_with_its_stored_date() {
        let project =
            Project::with_created_date("Atlas", "Internal portal", "активный", "2024-03-01 12:00:00");
        let parsed = Project::parse(&project.to_line()).unwrap();
        assert_eq!(parsed, project);
    }

    #[test]
    fn assignment_round_trips_with_its_stored_date() {
        let assignment =
            Assignment::with_assigned_date("ivanov", "Atlas", "Участник", "2024-03-02 09:15:00");
        let parsed = Assignment::parse(&assignment.to_line()).unwrap();
        assert_eq!(parsed, assignment);
    }

    #[test]
    fn fields_are_trimmed_on_parse() {
        let user = User::parse("  ivanov | h4sh |  Иван Иванов | QA | EMPLOYEE ").unwrap();
        assert_eq!(user.username(), "ivanov");
        assert_eq!(user.fullname(), "Иван Иванов");
        assert_eq!(user.department(), "QA");
    }

    #[test]
    fn too_few_fields_is_not_a_record() {
        assert!(User::parse("ivanov|h4sh").is_none());
        assert!(Project::parse("Atlas|desc|status").is_none());
        assert!(ScoreRecord::parse("ivanov").is_none());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let user = User::parse("ivanov|h4sh|Иван|QA|EMPLOYEE|junk|more").unwrap();
        assert_eq!(user.role(), Role::Employee);
    }

    #[test]
    fn unknown_role_degrades_to_employee() {
        let user = User::parse("ivanov|h4sh|Иван|QA|DIRECTOR").unwrap();
        assert_eq!(user.role(), Role::Employee);
    }

    #[test]
    fn hr_record_needs_only_four_fields() {
        let record = HrUserRecord::parse("petrova|h4sh|Анна Петрова|HR").unwrap();
        assert_eq!(record.0.role(), Role::Hr);
        assert_eq!(record.0.department(), "HR");
    }

    #[test]
    fn admin_record_tolerates_the_legacy_five_field_form() {
        let record = AdminRecord::parse("admin|h4sh|Administrator|ADMIN|ADMIN").unwrap();
        assert_eq!(record.0.username(), "admin");
        assert_eq!(record.0.role(), Role::Admin);
    }

    #[test]
    fn score_record_is_fixed_to_two_decimals() {
        let record = ScoreRecord {
            username: "ivanov".to_string(),
            score: 81.0,
        };
        assert_eq!(record.to_line(), "ivanov|81.00");
    }

    #[test]
    fn unparseable_score_is_rejected() {
        assert!(ScoreRecord::parse("ivanov|high").is_none());
    }

    #[test]
    fn loader_skips_blank_and_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.txt");
        std::fs::write(
            &path,
            "ivanov|h4sh|Иван Иванов|QA|EMPLOYEE\n\nbroken|line\npetrov|h4sh2|Пётр Петров|Продажи|PENDING\n",
        )
        .unwrap();

        let users: Vec<User> = load_records(&path);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username(), "ivanov");
        assert_eq!(users[1].role(), Role::Pending);
    }

    #[test]
    fn loader_returns_empty_for_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let users: Vec<User> = load_records(&dir.path().join("absent.txt"));
        assert!(users.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.txt");
        let projects = [
            Project::with_created_date("B", "second", "активный", "2024-02-01 00:00:00"),
            Project::with_created_date("A", "first", "завершенный", "2024-01-01 00:00:00"),
        ];

        save_records(&path, projects.iter()).unwrap();
        let loaded: Vec<Project> = load_records(&path);

        assert_eq!(loaded, projects);
    }
}
