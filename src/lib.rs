//! Dashboard SDK: endpoint registry, REST dispatcher and paginated list controller
//! for the construction-management admin dashboard.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod list;
pub mod models;
pub mod notify;
pub mod session;
pub mod settings;
pub mod url;

pub use auth::{AuthFlow, AuthStep};
pub use config::{dashboard_registry, resolve, EndpointConfig, EndpointRegistry, HttpMethod};
pub use dispatch::{Dispatcher, DispatcherBuilder, ResolvedRequest, UploadForm};
pub use endpoints::Endpoint;
pub use envelope::{page_count, Envelope, ListData, PAGE_SIZE};
pub use error::{ClientError, ConfigError};
pub use list::{ListController, ListPage, ListSource, ListState, Phase};
pub use notify::{Navigator, Notification, NotificationLevel, Notifier};
pub use session::{Locale, RequestContext, Session};
pub use settings::{init_tracing, Settings};
