pub mod handlers;
pub mod identity;

pub use handlers::*;
pub use identity::Identity;
