//! User accounts and their roles.

use std::{fmt, str::FromStr};

use sha2::{Digest, Sha256};

/// The role a user account holds within the system.
///
/// The role decides which backing file the record is written to and which
/// session menus are available after login. `Pending` marks a self-registered
/// account awaiting administrator approval for the HR role; structurally it is
/// an ordinary employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A regular employee.
    Employee,
    /// An HR manager.
    Hr,
    /// The administrator (a singleton account).
    Admin,
    /// An employee awaiting approval for the HR role.
    Pending,
}

impl Role {
    /// The canonical serialized form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Hr => "HR",
            Self::Admin => "ADMIN",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known [`Role`].
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMPLOYEE" => Ok(Self::Employee),
            "HR" => Ok(Self::Hr),
            "ADMIN" => Ok(Self::Admin),
            "PENDING" => Ok(Self::Pending),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// A user account.
///
/// The username is the unique key across every role partition. Passwords are
/// stored only as hashes; see [`hash_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password_hash: String,
    fullname: String,
    department: String,
    role: Role,
}

impl User {
    /// Construct a user record from its parts.
    ///
    /// `password_hash` must already be hashed; the store never sees
    /// plaintext passwords.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        fullname: impl Into<String>,
        department: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            fullname: fullname.into(),
            department: department.into(),
            role,
        }
    }

    /// The unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// The user's full name.
    #[must_use]
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// The department the user belongs to.
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// The user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Replace the full name.
    pub fn set_fullname(&mut self, fullname: impl Into<String>) {
        self.fullname = fullname.into();
    }

    /// Replace the department.
    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }

    pub(crate) const fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Hash a plaintext password for storage and comparison.
///
/// SHA-256 hex digest. Deterministic and unsalted: equal passwords always
/// produce equal hashes, which is what the global password-uniqueness check
/// relies on. This is integrity-grade hashing, not password-grade key
/// stretching.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    format!("{hash:x}")
}

/// Check a plaintext password against a stored hash.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}
