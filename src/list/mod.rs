//! List-data controller: server-driven paginated table state with debounced search
//! and externally triggered refetch.

mod controller;
mod source;
mod state;
pub use controller::*;
pub use source::{ListPage, ListSource};
pub use state::{ListError, ListState, Phase};
