use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use super::connector::{Connector, HttpRequest, HttpResponse, Method};
use super::error::ClientError;
use super::session::Session;

/// The single wrapped request helper: JSON in and out, bearer auth from the
/// session, uniform error translation.
pub struct Transport {
    base_url: String,
    connector: Box<dyn Connector>,
    session: Rc<Session>,
}

impl Transport {
    pub fn new(
        base_url: impl Into<String>,
        connector: Box<dyn Connector>,
        session: Rc<Session>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Transport {
            base_url,
            connector,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Rc<Session> {
        &self.session
    }

    /// Send `body` (if any) as JSON to `base_url + endpoint`.
    ///
    /// Returns the parsed body on 2xx, `Api` on any other status and
    /// `Transport` when no response arrived. A 2xx with no body (204, or an
    /// empty 200) is `None` rather than a `Decode` error; only a non-empty
    /// body that is not JSON fails to decode.
    pub fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        let token = self.session.get_token();
        if let Some(token) = &token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let request = HttpRequest {
            method,
            url,
            headers,
            body: body.map(Value::to_string),
        };
        debug!(%method, url = %request.url, authenticated = token.is_some(), "sending request");

        let response = self.connector.send(&request).inspect_err(|e| {
            warn!(%method, url = %request.url, error = %e, "request failed");
        })?;
        interpret(method, &request.url, response)
    }
}

fn interpret(method: Method, url: &str, response: HttpResponse) -> Result<Option<Value>, ClientError> {
    let HttpResponse { status, body } = response;
    if !(200..300).contains(&status) {
        warn!(%method, %url, status, "server returned an error");
        return Err(ClientError::Api { status, body });
    }
    debug!(%method, %url, status, "response received");

    if status == 204 || body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| ClientError::Decode(e.to_string()))
}
