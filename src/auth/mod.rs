pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::CurrentUser;
pub use jwt::{issue_token, JwtKeys};
pub use middleware::require_auth;
