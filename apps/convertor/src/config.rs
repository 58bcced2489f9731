use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub base_url: String,
    /// Presentation template; the bundled one is used when unset.
    pub template_file: Option<PathBuf>,
    /// Extraction instruction; the bundled one is used when unset.
    pub prompt_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub images_dir: PathBuf,
    pub logo_file: Option<String>,
    pub concurrency: usize,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY")
            .context("Required environment variable 'OPENAI_API_KEY' is not set")?;

        Ok(Config {
            openai_api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            template_file: get("RESUME_TEMPLATE_FILE").map(PathBuf::from),
            prompt_file: get("RESUME_PROMPT_FILE").map(PathBuf::from),
            output_dir: PathBuf::from(get("RESUME_OUTPUT_DIR").unwrap_or_else(|| "Output".into())),
            images_dir: PathBuf::from(get("RESUME_IMAGES_DIR").unwrap_or_else(|| "Images".into())),
            logo_file: get("RESUME_LOGO_FILE"),
            concurrency: parse_positive(get("RESUME_CONCURRENCY"), 1, "RESUME_CONCURRENCY")?,
            llm_max_attempts: parse_positive(get("LLM_MAX_ATTEMPTS"), 1, "LLM_MAX_ATTEMPTS")?,
            llm_timeout_secs: parse_positive(get("LLM_TIMEOUT_SECS"), 120, "LLM_TIMEOUT_SECS")?,
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.openai_api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
            max_attempts: self.llm_max_attempts,
        }
    }

    /// Output directory as an absolute path; relative paths sit under the working directory.
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        if self.output_dir.is_absolute() {
            return Ok(self.output_dir.clone());
        }
        let cwd = std::env::current_dir().context("Failed to read the working directory")?;
        Ok(cwd.join(&self.output_dir))
    }
}

fn parse_positive<T>(value: Option<String>, default: T, key: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = value else {
        return Ok(default);
    };
    let parsed = raw
        .trim()
        .parse::<T>()
        .ok()
        .with_context(|| format!("{key} must be a positive integer, got '{raw}'"))?;
    if parsed <= T::default() {
        bail!("{key} must be a positive integer, got '{raw}'");
    }
    Ok(parsed)
}
