//! Endpoint dispatch: path substitution, header plumbing, error normalisation.

mod dispatcher;
pub mod normalize;
pub mod upload;
pub use dispatcher::{resolve_endpoint, to_payload, Dispatcher, DispatcherBuilder, ResolvedRequest};
pub use normalize::{server_message, ErrorNormalizer, DEFAULT_EXPECTED_LOGIN_FAILURES, SIGN_IN_ROUTE};
pub use upload::UploadForm;
