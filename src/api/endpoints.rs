use super::transport::{ApiRequest, Method};

/// Method and path of one backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn add_product() -> Self {
        Self::new(Method::Post, "/product/add")
    }

    pub fn add_user() -> Self {
        Self::new(Method::Post, "/user/add")
    }

    pub fn authenticate() -> Self {
        Self::new(Method::Post, "/user/authenticate")
    }

    pub fn all_products() -> Self {
        Self::new(Method::Get, "/product/getall")
    }

    pub fn delete_product(id: &str) -> Self {
        Self::new(Method::Delete, format!("/product/delete/{}", encode_segment(id)))
    }

    pub fn delete_file(file_name: &str) -> Self {
        Self::new(
            Method::Delete,
            format!("/util/deletefile/{}", encode_segment(file_name)),
        )
    }

    pub fn upload_file() -> Self {
        Self::new(Method::Post, "/util/uploadfile")
    }

    pub fn request(&self) -> ApiRequest {
        ApiRequest::new(self.method, self.path.clone())
    }
}

/// Percent-encodes characters that would break a single path segment.
fn encode_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}
