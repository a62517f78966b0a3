//! Authentication module
//!
//! JWT-based authentication for trainer accounts with argon2 password
//! hashing. Clients (students) never authenticate; the trainer is the
//! only principal.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthTrainer;
pub use password::PasswordService;
