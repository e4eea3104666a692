//! HTTP transport seam.
//!
//! The client never opens connections itself. Callers supply an
//! [`HttpTransport`] that owns pooling, TLS, timeouts and retries.

use std::io::Read;
use std::sync::Arc;

use http::{Request, Response};

/// Response body stream. Dropping it releases the underlying connection.
pub type ResponseBody = Box<dyn Read + Send>;

/// Transport-level failure (DNS, connect, TLS, ...), passed through as-is.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// User-implemented HTTP layer.
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the response with its unread body.
    fn execute(&self, request: Request<()>) -> Result<Response<ResponseBody>, TransportError>;
}

impl<F> HttpTransport for F
where
    F: Fn(Request<()>) -> Result<Response<ResponseBody>, TransportError> + Send + Sync,
{
    fn execute(&self, request: Request<()>) -> Result<Response<ResponseBody>, TransportError> {
        self(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn execute(&self, request: Request<()>) -> Result<Response<ResponseBody>, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "reqwest")]
impl HttpTransport for reqwest::blocking::Client {
    fn execute(&self, request: Request<()>) -> Result<Response<ResponseBody>, TransportError> {
        let (parts, ()) = request.into_parts();
        let response = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .send()?;

        let mut builder = Response::builder().status(response.status());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(
                response
                    .headers()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }
        Ok(builder.body(Box::new(response) as ResponseBody)?)
    }
}
