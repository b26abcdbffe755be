//! Auth-domain models: scopes, client credentials, and access tokens.

pub mod credentials;
pub mod scope;
pub mod token;

pub use credentials::*;
pub use scope::*;
pub use token::*;
