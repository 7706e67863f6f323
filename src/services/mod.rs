//! Domain services. Each one owns a handle to the shared connection pool,
//! injected at construction.

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use posts::PostService;
pub use users::UserService;
