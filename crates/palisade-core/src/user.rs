//! User identity model.
//!
//! Users are either local or provisioned through an external auth connector.
//! The model carries everything a proxy needs to answer authorization
//! questions: permitted OS logins, linked external identities, roles, lock
//! status and provenance.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{CoreError, Result};

// =============================================================================
// Login validation
// =============================================================================

/// Longest login accepted by common Unix userland tools.
const MAX_LOGIN_LEN: usize = 32;

static UNIX_LOGIN_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-z_][a-z0-9_-]*\$?$").expect("Invalid unix login regex")
});

/// Returns `true` if `login` is a valid Unix login name.
#[must_use]
pub fn is_valid_unix_login(login: &str) -> bool {
    !login.is_empty() && login.len() <= MAX_LOGIN_LEN && UNIX_LOGIN_REGEX.is_match(login)
}

// =============================================================================
// External identities
// =============================================================================

/// An externally verified identity linked to a user through an auth
/// connector, letting the user log in with credentials the cluster never
/// sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Identifier of the connector that verified this identity.
    pub connector_id: String,

    /// Verified username or email claim.
    pub username: String,
}

impl ExternalIdentity {
    /// Creates an identity for the given connector and claim.
    #[must_use]
    pub fn new(connector_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            connector_id: connector_id.into(),
            username: username.into(),
        }
    }

    /// Checks that both parts of the identity are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector id or the username is empty.
    pub fn validate(&self) -> Result<()> {
        if self.connector_id.is_empty() {
            return Err(CoreError::invalid_identity("missing connector id"));
        }
        if self.username.is_empty() {
            return Err(CoreError::invalid_identity("missing username"));
        }
        Ok(())
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.connector_id, self.username)
    }
}

// =============================================================================
// Provenance
// =============================================================================

/// Reference to the connector that automatically created a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorRef {
    /// Connector type, e.g. `oidc`.
    #[serde(rename = "connector_type")]
    pub kind: String,

    /// Connector id.
    pub id: String,

    /// External identity of the user on the connector's side.
    pub identity: String,
}

/// Reference to a user by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User name.
    pub name: String,
}

/// Who or what created a user, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    /// Present when the user was provisioned automatically by a connector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<ConnectorRef>,

    /// Creation time.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<OffsetDateTime>,

    /// The user who performed the creation.
    #[serde(default)]
    pub user: UserRef,
}

impl CreatedBy {
    /// Returns `true` if nothing is known about who created the user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.name.is_empty()
    }
}

impl fmt::Display for CreatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "system");
        }
        if let Some(connector) = &self.connector {
            write!(
                f,
                "{} connector {} for user {}",
                connector.kind, connector.id, connector.identity
            )?;
        } else {
            write!(f, "{}", self.user.name)?;
        }
        if let Some(time) = self.time {
            write!(f, " at {time}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Login status
// =============================================================================

/// Login-lock status of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStatus {
    /// Whether logins are currently refused.
    #[serde(default)]
    pub is_locked: bool,

    /// Reason shown while the lock is enforced.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locked_message: String,

    /// When the lock was applied.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub locked_time: Option<OffsetDateTime>,

    /// When the lock expires.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub lock_expires: Option<OffsetDateTime>,
}

// =============================================================================
// User
// =============================================================================

/// A user known to the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user name; must itself be a valid Unix login.
    pub name: String,

    /// OS logins this user may assume, in preference order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_logins: Vec<String>,

    /// Linked external identities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<ExternalIdentity>,

    /// Roles assigned to the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Login-lock status.
    #[serde(default)]
    pub status: LoginStatus,

    /// Expiry for ephemeral or provisioned users.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<OffsetDateTime>,

    /// Who or what created the user.
    #[serde(default, skip_serializing_if = "CreatedBy::is_empty")]
    pub created_by: CreatedBy,
}

impl User {
    /// Creates a user with the given name and nothing else set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_logins: Vec::new(),
            identities: Vec::new(),
            roles: Vec::new(),
            status: LoginStatus::default(),
            expires: None,
            created_by: CreatedBy::default(),
        }
    }

    /// Creates a new user builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> UserBuilder {
        UserBuilder::new(name)
    }

    /// Checks basic user parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or any allowed login is not a valid Unix
    /// login, or if any linked identity is incomplete.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_unix_login(&self.name) {
            return Err(CoreError::invalid_login(&self.name));
        }
        for login in &self.allowed_logins {
            if !is_valid_unix_login(login) {
                return Err(CoreError::invalid_login(login));
            }
        }
        for identity in &self.identities {
            identity.validate()?;
        }
        Ok(())
    }

    /// Returns `true` if the user has a specific role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Adds a role, keeping the role list free of duplicates.
    pub fn add_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.has_role(&role) {
            self.roles.push(role);
        }
    }

    /// Locks the user out until the given time.
    pub fn set_locked(&mut self, until: OffsetDateTime, reason: impl Into<String>) {
        self.status.is_locked = true;
        self.status.locked_message = reason.into();
        self.status.lock_expires = Some(until);
    }

    /// Clears any login lock.
    pub fn unlock(&mut self) {
        self.status = LoginStatus::default();
    }

    /// Returns `true` if a login lock is currently in force.
    ///
    /// A lock with no expiry holds indefinitely.
    #[must_use]
    pub fn is_locked(&self, now: OffsetDateTime) -> bool {
        self.status.is_locked && self.status.lock_expires.is_none_or(|until| now < until)
    }

    /// Returns `true` if an account expiry is set and has passed.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

// =============================================================================
// User builder
// =============================================================================

/// Builder for creating `User` instances.
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            user: User::new(name),
        }
    }

    /// Appends a permitted OS login.
    #[must_use]
    pub fn allowed_login(mut self, login: impl Into<String>) -> Self {
        self.user.allowed_logins.push(login.into());
        self
    }

    /// Replaces the permitted OS logins.
    #[must_use]
    pub fn allowed_logins(mut self, logins: Vec<String>) -> Self {
        self.user.allowed_logins = logins;
        self
    }

    /// Links an external identity.
    #[must_use]
    pub fn identity(mut self, identity: ExternalIdentity) -> Self {
        self.user.identities.push(identity);
        self
    }

    /// Adds a role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.user.add_role(role);
        self
    }

    /// Sets the account expiry.
    #[must_use]
    pub fn expires(mut self, at: OffsetDateTime) -> Self {
        self.user.expires = Some(at);
        self
    }

    /// Records who created the user.
    #[must_use]
    pub fn created_by(mut self, created_by: CreatedBy) -> Self {
        self.user.created_by = created_by;
        self
    }

    /// Validates and builds the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the assembled user fails [`User::validate`].
    pub fn build(self) -> Result<User> {
        self.user.validate()?;
        Ok(self.user)
    }
}
