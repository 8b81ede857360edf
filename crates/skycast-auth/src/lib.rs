pub mod identity;

pub use identity::{AuthError, IdentityProvider, Session, SignedInUser, StaticIdentity};
