use serde::{Deserialize, Deserializer, Serialize};

/// Logged-in user record returned by `/user/authenticate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Furniture listing as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Product {
    /// Full image URL, or the placeholder when the listing has no picture.
    pub fn image_url(&self, image_base_url: &str, placeholder: &str) -> String {
        match &self.image {
            Some(key) => format!("{}{}", image_base_url, key),
            None => placeholder.to_string(),
        }
    }

    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) if price > 0.0 => format!("Price: \u{20b9} {}", price),
            _ => "Price Not Specified Yet".to_string(),
        }
    }

    pub fn year_label(&self) -> String {
        self.year
            .map(|year| format!("{}", year as i64))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// Body returned by `/util/uploadfile`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

/// Accepts numbers, numeric strings, empty strings and null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Treats empty strings the same as a missing value.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}
