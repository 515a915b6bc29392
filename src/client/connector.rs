use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;

use super::error::ClientError;

/// HTTP methods the service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and waits for its response.
///
/// Implementations return `ClientError::Transport` only when no response
/// arrived; any status code, including errors, is an `Ok` response.
pub trait Connector {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Blocking reqwest client. No timeout and no retries.
pub struct ReqwestConnector {
    client: Client,
}

impl ReqwestConnector {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ReqwestConnector { client })
    }
}

impl Connector for ReqwestConnector {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: Method::Get,
            url: "http://localhost/todos".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let connector = ReqwestConnector::new().unwrap();
        let req = HttpRequest {
            method: Method::Get,
            url: format!("http://127.0.0.1:{}/todos", port),
            headers: Vec::new(),
            body: None,
        };
        assert!(matches!(
            connector.send(&req),
            Err(ClientError::Transport(_))
        ));
    }

    #[test]
    fn malformed_url_is_a_transport_error() {
        let connector = ReqwestConnector::new().unwrap();
        let req = HttpRequest {
            method: Method::Get,
            url: "not a url/todos".into(),
            headers: Vec::new(),
            body: None,
        };
        assert!(matches!(
            connector.send(&req),
            Err(ClientError::Transport(_))
        ));
    }
}
