use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::ClientError;
use crate::utils::paths;

const TMP_SUFFIX: &str = "tmp";

pub const ENV_BACKEND_URL: &str = "REFURNISH_BACKEND_URL";
pub const ENV_ADMIN_CODE: &str = "REFURNISH_ADMIN_CODE";
pub const ENV_ADMIN_VERIFICATION: &str = "REFURNISH_ADMIN_VERIFICATION";
pub const ENV_IMAGE_BASE_URL: &str = "REFURNISH_IMAGE_BASE_URL";

/// Who decides whether an admin signup code is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdminVerification {
    /// The code is forwarded and the backend grants or refuses admin.
    #[default]
    Server,
    /// Legacy behaviour: the code is compared locally against `admin_code`.
    Client,
}

impl AdminVerification {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "server" => Some(Self::Server),
            "client" => Some(Self::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub backend_url: String,
    pub image_base_url: String,
    pub placeholder_image_url: String,
    #[serde(default)]
    pub admin_verification: AdminVerification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".into(),
            image_base_url: "https://refurnished.s3.amazonaws.com/".into(),
            placeholder_image_url: "https://t3.ftcdn.net/jpg/04/62/93/66/360_F_462936689_BpEEcxfgMuYPfTaIAOC1tCDurmsno7Sp.jpg".into(),
            admin_verification: AdminVerification::Server,
            admin_code: None,
        }
    }
}

impl Config {
    /// Applies `REFURNISH_*` environment variables on top of this config.
    pub fn apply_env(&mut self) -> Result<(), ClientError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        if let Some(url) = lookup(ENV_IMAGE_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.image_base_url = url.trim().to_string();
        }
        if let Some(code) = lookup(ENV_ADMIN_CODE) {
            self.admin_code = Some(code);
        }
        if let Some(raw) = lookup(ENV_ADMIN_VERIFICATION) {
            self.admin_verification = AdminVerification::parse(&raw).ok_or_else(|| {
                ClientError::Config(format!(
                    "{} must be `server` or `client`, got `{}`",
                    ENV_ADMIN_VERIFICATION, raw
                ))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ClientError> {
        let config_root = paths::config_dir_in(&base);
        fs::create_dir_all(&config_root)?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    /// Loads the file (or defaults) and then applies environment overrides.
    pub fn load_effective(&self) -> Result<Config, ClientError> {
        let mut config = self.load()?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn load(&self) -> Result<Config, ClientError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ClientError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
