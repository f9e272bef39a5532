//! HTTP seam between the form controllers and the marketplace backend.
//!
//! Everything above this module talks to a [`Transport`]; the production
//! implementation is [`ReqwestTransport`], tests plug in scripted fakes.

pub mod endpoints;
pub mod http;
pub mod models;
pub mod transport;

pub use endpoints::Endpoint;
pub use http::ReqwestTransport;
pub use models::{Product, SessionUser, UploadResponse};
pub use transport::{
    ApiRequest, ApiResponse, Method, MultipartFile, RequestBody, Transport, TransportError,
};
