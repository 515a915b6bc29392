pub mod api;
pub mod connector;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod session;
pub mod transport;

pub use api::TodoApi;
pub use connector::{Connector, HttpRequest, HttpResponse, Method, ReqwestConnector};
pub use error::ClientError;
pub use session::Session;
pub use transport::Transport;
