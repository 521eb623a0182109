//! Safe URL building: templates from config only, values substituted from payloads.

mod template;
pub mod params;
pub use template::*;
pub use params::*;
