use reqwest::blocking::{multipart, Client};
use tracing::{debug, error};

use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport, TransportError};

/// [`Transport`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        debug!(method = %request.method, %url, "sending request");

        let builder = self.client.request(method, &url);
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(file) => {
                let part = multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(to_transport_error)?;
                builder.multipart(multipart::Form::new().part(file.field, part))
            }
        };

        let response = builder.send().map_err(|err| {
            error!(%url, error = %err, "request failed");
            to_transport_error(err)
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(to_transport_error)?.to_vec();
        debug!(%url, status, "received response");
        Ok(ApiResponse { status, body })
    }
}

fn to_transport_error(err: reqwest::Error) -> TransportError {
    TransportError::new(err.to_string())
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
