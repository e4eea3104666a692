use std::io::Read;

use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{Request, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use crate::codec::MediaTypeTable;
use crate::error::{StatusError, UnsupportedContentTypeError, WebFingerError};
use crate::transport::HttpTransport;
use crate::types::Message;

/// RFC 7033 well-known path.
pub const WELL_KNOWN_PATH: &str = "/.well-known/webfinger";

/// `Accept` header sent with every lookup.
pub const ACCEPT_HEADER: &str = "application/jrd+json, application/xrd+xml";

/// Extra media types to treat as XRD or JRD, on top of the builtin ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdditionalMediaTypes {
    pub xml: Vec<String>,
    pub json: Vec<String>,
}

/// Client configuration. Every field is optional when deserialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientOptions {
    /// Sent verbatim as `User-Agent` when set.
    pub user_agent: Option<String>,
    /// Use `http` instead of `https`. Intended for tests and intranets.
    pub insecure_http: bool,
    pub additional_media_types: AdditionalMediaTypes,
}

/// WebFinger client over a caller-supplied transport.
///
/// Holds no mutable state; a single client can serve concurrent lookups if
/// the transport allows it.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    options: ClientOptions,
    media_types: MediaTypeTable,
}

impl<T: HttpTransport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        let media_types = media_type_table(&options);
        Self {
            transport,
            options,
            media_types,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_insecure_http(mut self, insecure_http: bool) -> Self {
        self.options.insecure_http = insecure_http;
        self
    }

    pub fn with_additional_xml_type(mut self, media_type: impl Into<String>) -> Self {
        self.options.additional_media_types.xml.push(media_type.into());
        self.media_types = media_type_table(&self.options);
        self
    }

    pub fn with_additional_json_type(mut self, media_type: impl Into<String>) -> Self {
        self.options.additional_media_types.json.push(media_type.into());
        self.media_types = media_type_table(&self.options);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{scheme}://{host}/.well-known/webfinger?resource={resource}`.
    pub fn request_url(&self, host: &str, resource: &str) -> Result<Url, WebFingerError> {
        let scheme = if self.options.insecure_http {
            "http"
        } else {
            "https"
        };
        if host.is_empty() || host.contains(['/', '?', '#', '@', '\\']) {
            return Err(WebFingerError::InvalidHost(host.to_string()));
        }
        let mut url = Url::parse(&format!("{scheme}://{host}{WELL_KNOWN_PATH}"))?;
        url.set_query(Some(&format!("resource={}", query_escape(resource))));
        Ok(url)
    }

    /// Look up `resource` on `host`.
    ///
    /// # Errors
    /// - `WebFingerError::NotFound` for 404 and 410
    /// - `WebFingerError::Status` for any other non-2xx status
    /// - `WebFingerError::UnsupportedContentType` when no codec handles the
    ///   response media type
    /// - `WebFingerError::Transport`, `ContentType`, `Body` or `Decode` when
    ///   the request or the response body fails
    pub fn perform(&self, host: &str, resource: &str) -> Result<Message, WebFingerError> {
        let url = self.request_url(host, resource)?;

        let mut request = Request::get(url.as_str()).header(ACCEPT, ACCEPT_HEADER);
        if let Some(user_agent) = &self.options.user_agent {
            request = request.header(USER_AGENT, user_agent.as_str());
        }
        let request = request.body(())?;

        debug!(url = %url, "sending WebFinger request");
        // The body is owned by `response` and closed when it drops, on every
        // return below.
        let response = self
            .transport
            .execute(request)
            .map_err(WebFingerError::Transport)?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "WebFinger response received");
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(WebFingerError::NotFound);
        }
        if !status.is_success() {
            return Err(StatusError {
                url: url.to_string(),
                code: status.as_u16(),
                status: status.canonical_reason().unwrap_or_default().to_string(),
            }
            .into());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
        let media_type: mime::Mime = content_type.parse()?;
        let essence = media_type.essence_str();

        let Some(format) = self.media_types.lookup(essence) else {
            warn!(url = %url, content_type = essence, "unsupported WebFinger content type");
            return Err(UnsupportedContentTypeError {
                content_type: essence.to_string(),
            }
            .into());
        };

        let mut body = Vec::new();
        response
            .into_body()
            .read_to_end(&mut body)
            .map_err(WebFingerError::Body)?;

        format.codec().decode(&body).map_err(|source| {
            warn!(url = %url, %format, error = %source, "failed to decode WebFinger response");
            WebFingerError::Decode { format, source }
        })
    }
}

/// Form-encode `value` keeping only `-_.~` and alphanumerics literal, with
/// spaces as `+`.
fn query_escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .map(|chunk| match chunk {
            "%7E" => "~".to_string(),
            _ => chunk.replace('*', "%2A"),
        })
        .collect()
}

fn media_type_table(options: &ClientOptions) -> MediaTypeTable {
    MediaTypeTable::new(
        options.additional_media_types.xml.iter().cloned(),
        options.additional_media_types.json.iter().cloned(),
    )
}
