pub mod extract;
pub mod password;
pub mod policy;
pub mod token;

pub use extract::AuthUser;
pub use policy::{authorize_mutation, can_mutate, Owned};
pub use token::{Claims, TokenService};
