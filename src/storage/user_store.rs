//! The user store.
//!
//! One in-memory collection keyed by username holds every account; the
//! historical three-way partition (employee/pending, HR, admin) survives only
//! as a serialization concern, with each partition written to its own file in
//! its own format. Usernames are unique across the whole collection, which is
//! exactly the old cross-partition invariant.

use std::{cmp::Ordering, fs, path::PathBuf};

use crate::domain::{
    Role, User,
    user::hash_password,
};

use super::{
    ADMIN_USERS_FILE, HR_USERS_FILE, SystemConfig, USERS_FILE,
    record::{self, AdminRecord, HrUserRecord, Record},
};

/// Department recorded for the administrator account.
pub(crate) const ADMIN_DEPARTMENT: &str = "ADMIN";

/// Login of the synthesized default administrator.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the synthesized default administrator (stored hashed).
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_ADMIN_FULLNAME: &str = "System administrator";

/// File-backed store of user accounts.
pub struct UserStore {
    dir: PathBuf,
    users: Vec<User>,
}

impl UserStore {
    /// Open the store over the given data directory, loading every account
    /// into memory.
    ///
    /// A missing or unreadable admin file is repaired on the spot: a default
    /// administrator is synthesized, persisted, and its credentials logged so
    /// the operator can log in and change them.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            dir: dir.into(),
            users: Vec::new(),
        };
        store.load();
        store
    }

    /// Reload every partition from disk, discarding in-memory state.
    pub fn load(&mut self) {
        self.users.clear();

        // HR and ADMIN rows in the main file are stale leftovers: all HR and
        // admin state lives exclusively in the dedicated files.
        let main: Vec<User> = record::load_records(&self.dir.join(USERS_FILE));
        self.users.extend(
            main.into_iter()
                .filter(|user| !matches!(user.role(), Role::Hr | Role::Admin)),
        );

        let hr: Vec<HrUserRecord> = record::load_records(&self.dir.join(HR_USERS_FILE));
        self.users.extend(hr.into_iter().map(|record| record.0));

        self.load_admin();
    }

    fn load_admin(&mut self) {
        let path = self.dir.join(ADMIN_USERS_FILE);
        let admin = fs::read_to_string(&path)
            .ok()
            .and_then(|content| content.lines().next().map(str::to_string))
            .and_then(|line| AdminRecord::parse(&line));

        match admin {
            Some(AdminRecord(admin)) => self.users.push(admin),
            None => self.create_default_admin(),
        }
    }

    fn create_default_admin(&mut self) {
        let admin = User::new(
            DEFAULT_ADMIN_USERNAME,
            hash_password(DEFAULT_ADMIN_PASSWORD),
            DEFAULT_ADMIN_FULLNAME,
            ADMIN_DEPARTMENT,
            Role::Admin,
        );
        tracing::warn!(
            "admin file missing or unreadable; created default administrator \
             (login: {DEFAULT_ADMIN_USERNAME}, password: {DEFAULT_ADMIN_PASSWORD}). \
             Change the password after first login."
        );
        self.users.push(admin);
        self.persist_admin();
    }

    /// Look up any account by username.
    ///
    /// Usernames are unique across all partitions, so at most one record can
    /// match.
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username() == username)
    }

    /// Add an account.
    ///
    /// Fails when the username is already taken in any partition, or when the
    /// role is `Admin` (the administrator is a singleton owned by the store).
    /// Persists every partition on success.
    pub fn add_user(&mut self, user: User) -> bool {
        if user.role() == Role::Admin {
            return false;
        }
        if self.find_by_username(user.username()).is_some() {
            return false;
        }
        self.users.push(user);
        self.persist_all();
        true
    }

    /// Remove an employee or pending account.
    ///
    /// HR accounts are not touched; see
    /// [`Self::remove_hr_user_by_username`]. Removing project assignments for
    /// the deleted user is the caller's responsibility.
    pub fn remove_user_by_username(&mut self, username: &str) -> bool {
        let Some(index) = self.users.iter().position(|user| {
            user.username() == username && matches!(user.role(), Role::Employee | Role::Pending)
        }) else {
            return false;
        };
        self.users.remove(index);
        self.persist_users();
        true
    }

    /// Remove an HR account.
    pub fn remove_hr_user_by_username(&mut self, username: &str) -> bool {
        let Some(index) = self
            .users
            .iter()
            .position(|user| user.username() == username && user.role() == Role::Hr)
        else {
            return false;
        };
        self.users.remove(index);
        self.persist_hr();
        true
    }

    /// Promote a pending account to HR.
    ///
    /// Succeeds only for an existing account whose role is `Pending`; any
    /// other case returns `false` and changes nothing. On success the account
    /// moves from the main file to the HR file, all fields preserved.
    pub fn move_user_to_hr(&mut self, username: &str) -> bool {
        let Some(user) = self
            .users
            .iter_mut()
            .find(|user| user.username() == username && user.role() == Role::Pending)
        else {
            return false;
        };
        user.set_role(Role::Hr);
        self.persist_all();
        true
    }

    /// Update the full name and department of an employee or pending account.
    pub fn update_employee(&mut self, username: &str, fullname: &str, department: &str) -> bool {
        let Some(user) = self.users.iter_mut().find(|user| {
            user.username() == username && matches!(user.role(), Role::Employee | Role::Pending)
        }) else {
            return false;
        };
        user.set_fullname(fullname);
        user.set_department(department);
        self.persist_users();
        true
    }

    /// Whether any account already stores this password hash.
    ///
    /// Passwords are required to be unique across all accounts; two accounts
    /// sharing a password would make either usable to probe the other.
    #[must_use]
    pub fn is_password_already_used(&self, password_hash: &str) -> bool {
        self.users
            .iter()
            .any(|user| user.password_hash() == password_hash)
    }

    /// Every account: the admin first, then employees and pending users, then
    /// HR managers.
    #[must_use]
    pub fn all_users(&self) -> Vec<&User> {
        let mut out: Vec<&User> = Vec::with_capacity(self.users.len());
        out.extend(self.users.iter().filter(|u| u.role() == Role::Admin));
        out.extend(
            self.users
                .iter()
                .filter(|u| matches!(u.role(), Role::Employee | Role::Pending)),
        );
        out.extend(self.users.iter().filter(|u| u.role() == Role::Hr));
        out
    }

    /// Employee and pending accounts, in load order.
    #[must_use]
    pub fn employees(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|user| matches!(user.role(), Role::Employee | Role::Pending))
            .collect()
    }

    /// Accounts awaiting HR-role approval.
    #[must_use]
    pub fn pending_users(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|user| user.role() == Role::Pending)
            .collect()
    }

    /// Look up an employee or pending account by username.
    #[must_use]
    pub fn employee(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| {
            user.username() == username && matches!(user.role(), Role::Employee | Role::Pending)
        })
    }

    /// Case-insensitive substring search over employee full names and
    /// usernames.
    #[must_use]
    pub fn search_employees(&self, keyword: &str) -> Vec<&User> {
        let keyword = keyword.to_lowercase();
        self.employees()
            .into_iter()
            .filter(|user| {
                user.fullname().to_lowercase().contains(&keyword)
                    || user.username().to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// Employees sorted by full name.
    #[must_use]
    pub fn employees_sorted_by_name(&self, ascending: bool) -> Vec<&User> {
        let mut employees = self.employees();
        employees.sort_by(|a, b| {
            let ordering = a.fullname().cmp(b.fullname());
            if ascending { ordering } else { ordering.reverse() }
        });
        employees
    }

    /// Employees paired with their stored score, best first.
    ///
    /// Scores are rounded to two decimals. Rated employees come first, higher
    /// score first with ties broken by full name; unrated employees (score
    /// sentinel `-1.0`) follow, ordered by full name.
    #[must_use]
    pub fn employees_sorted_by_rating<'a>(&'a self, config: &SystemConfig) -> Vec<(&'a User, f64)> {
        let mut rated: Vec<(&User, f64)> = self
            .employees()
            .into_iter()
            .map(|user| {
                let mut rating = config.performance_score(user.username());
                if rating >= 0.0 {
                    rating = (rating * 100.0).round() / 100.0;
                }
                (user, rating)
            })
            .collect();

        rated.sort_by(|a, b| match (a.1 >= 0.0, b.1 >= 0.0) {
            (true, true) => b
                .1
                .partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.fullname().cmp(b.0.fullname())),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.0.fullname().cmp(b.0.fullname()),
        });

        rated
    }

    /// 1-based position of an employee in the rating order, with the total
    /// employee count.
    ///
    /// Returns `(-1, total)` when the username is not among the employees.
    #[must_use]
    pub fn employee_rank(&self, username: &str, config: &SystemConfig) -> (isize, usize) {
        let sorted = self.employees_sorted_by_rating(config);
        let total = sorted.len();

        sorted
            .iter()
            .position(|(user, _)| user.username() == username)
            .map_or((-1, total), |index| {
                (isize::try_from(index + 1).unwrap_or(isize::MAX), total)
            })
    }

    fn persist_all(&self) {
        self.persist_users();
        self.persist_hr();
        self.persist_admin();
    }

    fn persist_users(&self) {
        let path = self.dir.join(USERS_FILE);
        let records: Vec<&User> = self
            .users
            .iter()
            .filter(|user| matches!(user.role(), Role::Employee | Role::Pending))
            .collect();
        if let Err(error) = record::save_records(&path, records) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }

    fn persist_hr(&self) {
        let path = self.dir.join(HR_USERS_FILE);
        let records: Vec<HrUserRecord> = self
            .users
            .iter()
            .filter(|user| user.role() == Role::Hr)
            .cloned()
            .map(HrUserRecord)
            .collect();
        if let Err(error) = record::save_records(&path, &records) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }

    fn persist_admin(&self) {
        let path = self.dir.join(ADMIN_USERS_FILE);
        let records: Vec<AdminRecord> = self
            .users
            .iter()
            .filter(|user| user.role() == Role::Admin)
            .cloned()
            .map(AdminRecord)
            .collect();
        if let Err(error) = record::save_records(&path, &records) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open_store() -> (TempDir, UserStore) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let store = UserStore::open(tmp.path());
        (tmp, store)
    }

    fn employee(username: &str, fullname: &str) -> User {
        User::new(
            username,
            hash_password(&format!("pw-{username}")),
            fullname,
            "Разработка",
            Role::Employee,
        )
    }

    #[test]
    fn a_default_admin_is_synthesized_and_persisted() {
        let (tmp, store) = open_store();

        let admin = store.find_by_username(DEFAULT_ADMIN_USERNAME).unwrap();
        assert_eq!(admin.role(), Role::Admin);
        assert!(crate::domain::user::verify_password(
            DEFAULT_ADMIN_PASSWORD,
            admin.password_hash()
        ));

        let written = std::fs::read_to_string(tmp.path().join(ADMIN_USERS_FILE)).unwrap();
        assert_eq!(
            written.trim(),
            format!(
                "admin|{}|System administrator",
                hash_password(DEFAULT_ADMIN_PASSWORD)
            )
        );
    }

    #[test]
    fn an_empty_admin_file_is_repaired() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(ADMIN_USERS_FILE), "").unwrap();

        let store = UserStore::open(tmp.path());
        assert!(store.find_by_username(DEFAULT_ADMIN_USERNAME).is_some());
    }

    #[test]
    fn a_garbage_admin_file_is_repaired() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(ADMIN_USERS_FILE), "not a record\n").unwrap();

        let store = UserStore::open(tmp.path());
        let admin = store.find_by_username(DEFAULT_ADMIN_USERNAME).unwrap();
        assert_eq!(admin.role(), Role::Admin);
    }

    #[test]
    fn added_users_are_immediately_findable() {
        let (_tmp, mut store) = open_store();
        let user = employee("ivanov", "Иван Иванов");
        let hash = user.password_hash().to_string();

        assert!(store.add_user(user));
        assert_eq!(store.find_by_username("ivanov").unwrap().fullname(), "Иван Иванов");
        assert!(store.is_password_already_used(&hash));
    }

    #[test]
    fn duplicate_usernames_are_rejected_across_partitions() {
        let (_tmp, mut store) = open_store();
        assert!(store.add_user(User::new("lead", "h1", "Анна", "HR", Role::Hr)));

        let before = store.all_users().len();
        assert!(!store.add_user(employee("lead", "Самозванец")));
        assert!(!store.add_user(User::new(
            DEFAULT_ADMIN_USERNAME,
            "h2",
            "Самозванец",
            "QA",
            Role::Employee
        )));
        assert_eq!(store.all_users().len(), before);
    }

    #[test]
    fn admin_role_cannot_be_added() {
        let (_tmp, mut store) = open_store();
        assert!(!store.add_user(User::new("root2", "h", "X", ADMIN_DEPARTMENT, Role::Admin)));
    }

    #[test]
    fn hr_users_are_persisted_to_their_own_file() {
        let (tmp, mut store) = open_store();
        assert!(store.add_user(User::new("petrova", "h1", "Анна Петрова", "HR", Role::Hr)));

        let hr_file = std::fs::read_to_string(tmp.path().join(HR_USERS_FILE)).unwrap();
        assert_eq!(hr_file.trim(), "petrova|h1|Анна Петрова|HR");

        let users_file = std::fs::read_to_string(tmp.path().join(USERS_FILE)).unwrap();
        assert!(!users_file.contains("petrova"));
    }

    #[test]
    fn hr_and_admin_rows_in_the_main_file_are_discarded() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(USERS_FILE),
            "ivanov|h1|Иван|QA|EMPLOYEE\nstray|h2|Стас|HR|HR\nghost|h3|Гоша|ADMIN|ADMIN\n",
        )
        .unwrap();

        let store = UserStore::open(tmp.path());
        assert!(store.find_by_username("ivanov").is_some());
        assert!(store.find_by_username("stray").is_none());
        assert!(store.find_by_username("ghost").is_none());
    }

    #[test]
    fn a_malformed_line_drops_only_that_record() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(USERS_FILE),
            "ivanov|h1|Иван Иванов|QA|EMPLOYEE\nbroken|line\n",
        )
        .unwrap();

        let store = UserStore::open(tmp.path());
        assert_eq!(store.employees().len(), 1);
    }

    #[test]
    fn moving_a_pending_user_relocates_it() {
        let (tmp, mut store) = open_store();
        let pending = User::new("kandidat", "h9", "Кира Кандидат", "HR", Role::Pending);
        assert!(store.add_user(pending));

        assert!(store.move_user_to_hr("kandidat"));

        let moved = store.find_by_username("kandidat").unwrap();
        assert_eq!(moved.role(), Role::Hr);
        assert_eq!(moved.fullname(), "Кира Кандидат");
        assert_eq!(moved.department(), "HR");
        assert!(store.employee("kandidat").is_none());

        let hr_file = std::fs::read_to_string(tmp.path().join(HR_USERS_FILE)).unwrap();
        assert!(hr_file.contains("kandidat"));
        let users_file = std::fs::read_to_string(tmp.path().join(USERS_FILE)).unwrap();
        assert!(!users_file.contains("kandidat"));

        // A second promotion of the same username must fail.
        assert!(!store.move_user_to_hr("kandidat"));
    }

    #[test]
    fn only_pending_users_can_be_promoted() {
        let (_tmp, mut store) = open_store();
        assert!(store.add_user(employee("ivanov", "Иван Иванов")));

        assert!(!store.move_user_to_hr("ivanov"));
        assert!(!store.move_user_to_hr("nobody"));
        assert_eq!(store.find_by_username("ivanov").unwrap().role(), Role::Employee);
    }

    #[test]
    fn removal_is_partition_scoped() {
        let (_tmp, mut store) = open_store();
        assert!(store.add_user(employee("ivanov", "Иван Иванов")));
        assert!(store.add_user(User::new("petrova", "h1", "Анна Петрова", "HR", Role::Hr)));

        // The employee remover must not see HR accounts and vice versa.
        assert!(!store.remove_user_by_username("petrova"));
        assert!(!store.remove_hr_user_by_username("ivanov"));

        assert!(store.remove_user_by_username("ivanov"));
        assert!(store.remove_hr_user_by_username("petrova"));
        assert!(store.find_by_username("ivanov").is_none());
        assert!(store.find_by_username("petrova").is_none());
    }

    #[test]
    fn updating_an_employee_rewrites_its_fields() {
        let (_tmp, mut store) = open_store();
        assert!(store.add_user(employee("ivanov", "Иван Иванов")));

        assert!(store.update_employee("ivanov", "Иван Обновлённый", "QA"));
        let updated = store.employee("ivanov").unwrap();
        assert_eq!(updated.fullname(), "Иван Обновлённый");
        assert_eq!(updated.department(), "QA");

        assert!(!store.update_employee("nobody", "x", "y"));
    }

    #[test]
    fn search_matches_fullname_or_username_case_insensitively() {
        let (_tmp, mut store) = open_store();
        assert!(store.add_user(employee("ivanov", "Иван Иванов")));
        assert!(store.add_user(employee("sidorov", "Пётр Сидоров")));

        assert_eq!(store.search_employees("IVAN").len(), 1);
        assert_eq!(store.search_employees("Сидоров").len(), 1);
        assert!(store.search_employees("zzz").is_empty());
    }

    #[test]
    fn rating_sort_puts_rated_before_unrated() {
        let (tmp, mut store) = open_store();
        let mut config = SystemConfig::open(tmp.path());
        assert!(store.add_user(employee("low", "Борис")));
        assert!(store.add_user(employee("none", "Алиса")));
        assert!(store.add_user(employee("high", "Вера")));

        config.save_performance_score("low", 60.0);
        config.save_performance_score("high", 95.0);

        let sorted = store.employees_sorted_by_rating(&config);
        let order: Vec<&str> = sorted.iter().map(|(user, _)| user.username()).collect();
        assert_eq!(order, ["high", "low", "none"]);
        assert!((sorted[2].1 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn rating_ties_break_by_fullname() {
        let (tmp, mut store) = open_store();
        let mut config = SystemConfig::open(tmp.path());
        assert!(store.add_user(employee("b", "Борис")));
        assert!(store.add_user(employee("a", "Алиса")));

        config.save_performance_score("a", 80.0);
        config.save_performance_score("b", 80.0);

        let sorted = store.employees_sorted_by_rating(&config);
        assert_eq!(sorted[0].0.username(), "a");
    }

    #[test]
    fn rank_is_one_based_with_a_sentinel_for_strangers() {
        let (tmp, mut store) = open_store();
        let mut config = SystemConfig::open(tmp.path());
        assert!(store.add_user(employee("first", "Вера")));
        assert!(store.add_user(employee("second", "Борис")));
        config.save_performance_score("first", 90.0);
        config.save_performance_score("second", 50.0);

        assert_eq!(store.employee_rank("first", &config), (1, 2));
        assert_eq!(store.employee_rank("second", &config), (2, 2));
        assert_eq!(store.employee_rank("stranger", &config), (-1, 2));
    }

    #[test]
    fn the_store_survives_a_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let mut store = UserStore::open(tmp.path());
            assert!(store.add_user(employee("ivanov", "Иван Иванов")));
            assert!(store.add_user(User::new("petrova", "h1", "Анна Петрова", "HR", Role::Hr)));
        }

        let reopened = UserStore::open(tmp.path());
        assert_eq!(reopened.employees().len(), 1);
        assert_eq!(reopened.find_by_username("petrova").unwrap().role(), Role::Hr);
        assert!(reopened.find_by_username(DEFAULT_ADMIN_USERNAME).is_some());
    }
}
