use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "blog-desk";
const PASSWORD_ENV: &str = "BLOG_ADMIN_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_articles_dir")]
    pub articles_dir: String,

    #[serde(default = "default_site_title")]
    pub site_title: String,

    #[serde(default = "default_caption")]
    pub caption: String,

    #[serde(default = "default_about")]
    pub about: String,

    #[serde(default)]
    pub links: Vec<Link>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("blog.db").to_string_lossy().to_string()
}

fn default_articles_dir() -> String {
    "articles".to_string()
}

fn default_site_title() -> String {
    "My Blog".to_string()
}

fn default_caption() -> String {
    "Writing about all sorts of things".to_string()
}

fn default_about() -> String {
    "Scary stories, small talk and tech notes.".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            articles_dir: default_articles_dir(),
            site_title: default_site_title(),
            caption: default_caption(),
            about: default_about(),
            links: vec![Link {
                label: "Lolita Payao".to_string(),
                url: "https://lolitapayao.neocities.org/".to_string(),
            }],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Relative `articles_dir` values live next to `config.toml`.
    pub fn articles_path(&self) -> PathBuf {
        let dir = PathBuf::from(&self.articles_dir);
        if dir.is_absolute() {
            dir
        } else {
            Self::config_dir().join(dir)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Admin credentials, kept out of `config.toml` and the database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    pub admin_password: Option<String>,
}

impl Secrets {
    /// `BLOG_ADMIN_PASSWORD` wins over `secrets.toml`.
    pub fn load() -> Result<Self> {
        let from_env = std::env::var(PASSWORD_ENV).ok();
        Self::resolve(from_env, &Self::secrets_path())
    }

    pub fn secrets_path() -> PathBuf {
        Config::config_dir().join("secrets.toml")
    }

    pub(crate) fn resolve(from_env: Option<String>, path: &Path) -> Result<Self> {
        if let Some(password) = from_env.filter(|p| !p.is_empty()) {
            return Ok(Self {
                admin_password: Some(password),
            });
        }

        if !path.exists() {
            tracing::warn!("No admin password configured; admin mode is unavailable");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let secrets: Secrets = toml::from_str(&content)?;
        // An empty password locks admin mode, same as the env var
        Ok(Self {
            admin_password: secrets.admin_password.filter(|p| !p.is_empty()),
        })
    }
}
