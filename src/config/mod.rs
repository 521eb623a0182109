pub mod types;
pub mod loader;
pub mod validator;
pub mod resolved;
pub mod builtin;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;
pub use builtin::{dashboard_endpoints, dashboard_registry};
