pub mod error;
pub mod kind;
pub mod namespace;
pub mod record;
pub mod server;
pub mod user;

pub use error::{CoreError, ErrorCategory, Result};
pub use kind::EntityKind;
pub use namespace::{DEFAULT_NAMESPACE, Namespace};
pub use record::RawRecord;
pub use server::{CommandLabel, Server};
pub use user::{
    ConnectorRef, CreatedBy, ExternalIdentity, LoginStatus, User, UserBuilder, UserRef,
    is_valid_unix_login,
};
