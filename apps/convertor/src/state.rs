use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::llm_client::prompts::RESUME_EXTRACTION_SYSTEM;
use crate::render::{TemplateRenderer, DEFAULT_TEMPLATE};
use crate::resume::branding::load_logo_base64;
use crate::resume::Normalizer;

/// Read-only assets shared by every pipeline run: loaded once, never mutated.
pub struct SharedAssets {
    /// System instruction sent with every extraction call.
    pub prompt: String,
    pub renderer: TemplateRenderer,
    /// Carries the branding image attached to each record.
    pub normalizer: Normalizer,
}

impl SharedAssets {
    pub fn load(config: &Config) -> Result<Self> {
        let prompt = match &config.prompt_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompt file {}", path.display()))?,
            None => RESUME_EXTRACTION_SYSTEM.to_string(),
        };

        let template = match &config.template_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read template file {}", path.display()))?,
            None => DEFAULT_TEMPLATE.to_string(),
        };
        let renderer = TemplateRenderer::new(template).context("Failed to compile template")?;

        let logo = load_logo_base64(&config.images_dir, config.logo_file.as_deref());
        info!(
            "Assets loaded (custom prompt: {}, custom template: {}, logo: {})",
            config.prompt_file.is_some(),
            config.template_file.is_some(),
            !logo.is_empty()
        );

        Ok(Self {
            prompt,
            renderer,
            normalizer: Normalizer::new(logo),
        })
    }
}
