//! Pipeline Orchestrator: converts one resume file into HTML and DOCX.
//!
//! Flow: extract → model call → sanitize → normalize → render → convert → write.
//! Any stage error aborts the file; batch callers log it and move on.

pub mod batch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::docx::html_to_docx;
use crate::errors::{ConvertError, Stage};
use crate::extract::{extract_text, RawDocument};
use crate::llm_client::{strip_json_fences, ChatModel};
use crate::resume::extraction::parse_resume_with_model;
use crate::state::SharedAssets;

/// Where a run writes its two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifacts {
    pub html_path: PathBuf,
    pub docx_path: PathBuf,
}

impl OutputArtifacts {
    /// `<output_dir>/<basename>.html` and `<output_dir>/<basename>.docx`.
    pub fn for_input(output_dir: &Path, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Self {
            html_path: output_dir.join(format!("{stem}.html")),
            docx_path: output_dir.join(format!("{stem}.docx")),
        }
    }
}

/// Owns everything a run needs. Runs share only read-only state, so
/// independent files may be converted concurrently.
#[derive(Clone)]
pub struct Pipeline {
    model: Arc<dyn ChatModel>,
    assets: Arc<SharedAssets>,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(model: Arc<dyn ChatModel>, assets: Arc<SharedAssets>, output_dir: PathBuf) -> Self {
        Self {
            model,
            assets,
            output_dir,
        }
    }

    pub async fn run(&self, input: &Path) -> Result<OutputArtifacts, ConvertError> {
        debug!(stage = %Stage::Extract, "{}", input.display());
        let doc = RawDocument::open(input)?;
        let text = tokio::task::spawn_blocking(move || extract_text(&doc))
            .await
            .map_err(|e| ConvertError::ExtractionIo {
                path: input.to_path_buf(),
                message: format!("extraction task failed: {e}"),
            })??;

        debug!(stage = %Stage::ModelCall, "{} chars of resume text", text.len());
        let answer = parse_resume_with_model(self.model.as_ref(), &self.assets.prompt, text).await?;

        debug!(stage = %Stage::Sanitize, "stripping code fences");
        let cleaned = strip_json_fences(&answer);

        debug!(stage = %Stage::Normalize, "mapping model JSON");
        let record = self.assets.normalizer.normalize_str(&cleaned)?;
        debug!("Mapped model:\n{}", record.debug_dump());

        debug!(stage = %Stage::Render, "rendering template");
        let html = self.assets.renderer.render(&record)?;

        debug!(stage = %Stage::Convert, "building document");
        let html_for_docx = html.clone();
        let docx = tokio::task::spawn_blocking(move || html_to_docx(&html_for_docx))
            .await
            .map_err(|e| ConvertError::Convert(format!("conversion task failed: {e}")))??;

        debug!(stage = %Stage::Write, "{}", self.output_dir.display());
        let artifacts = OutputArtifacts::for_input(&self.output_dir, input);
        write_file(&self.output_dir, &artifacts.html_path, html.into_bytes()).await?;
        write_file(&self.output_dir, &artifacts.docx_path, docx).await?;

        info!(
            "HTML and DOCX files generated: {}, {}",
            artifacts.html_path.display(),
            artifacts.docx_path.display()
        );
        Ok(artifacts)
    }
}

async fn write_file(dir: &Path, path: &Path, bytes: Vec<u8>) -> Result<(), ConvertError> {
    let write_error = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
    tokio::fs::write(path, bytes).await.map_err(write_error)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::render::{TemplateRenderer, DEFAULT_TEMPLATE};
    use crate::resume::Normalizer;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Answers every call with a fixed result.
    pub(crate) struct StubModel(pub Result<String, fn() -> LlmError>);

    #[async_trait]
    impl ChatModel for StubModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            match &self.0 {
                Ok(answer) => Ok(answer.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    pub(crate) fn pipeline(model: StubModel, output_dir: &Path) -> Pipeline {
        let assets = SharedAssets {
            prompt: "Return JSON.".to_string(),
            renderer: TemplateRenderer::new(DEFAULT_TEMPLATE).unwrap(),
            normalizer: Normalizer::default(),
        };
        Pipeline::new(Arc::new(model), Arc::new(assets), output_dir.to_path_buf())
    }

    #[test]
    fn test_artifact_paths_use_input_basename() {
        let artifacts =
            OutputArtifacts::for_input(Path::new("/out"), Path::new("/in/jane.doe.pdf"));
        assert_eq!(artifacts.html_path, PathBuf::from("/out/jane.doe.html"));
        assert_eq!(artifacts.docx_path, PathBuf::from("/out/jane.doe.docx"));
    }

    #[tokio::test]
    async fn test_fenced_answer_converts_to_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("jane.txt");
        std::fs::write(&input, "Jane Doe\nStaff Engineer").unwrap();
        let output_dir = dir.path().join("Output");

        let model = StubModel(Ok(
            "```json\n{\"Full Name\":\"A\",\"Key_Achievements\":[\"<b>Shipped</b>\"]}\n```"
                .to_string(),
        ));
        let artifacts = pipeline(model, &output_dir).run(&input).await.unwrap();

        let html = std::fs::read_to_string(&artifacts.html_path).unwrap();
        assert!(html.contains("<h1>A</h1>"));
        assert!(html.contains("<li><b>Shipped</b></li>"));
        let docx = std::fs::read(&artifacts.docx_path).unwrap();
        assert_eq!(&docx[..2], b"PK");
        assert_eq!(artifacts.html_path, output_dir.join("jane.html"));
    }

    #[tokio::test]
    async fn test_missing_completion_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("jane.txt");
        std::fs::write(&input, "Jane Doe").unwrap();
        let output_dir = dir.path().join("Output");

        let model = StubModel(Err(|| LlmError::EmptyContent));
        let err = pipeline(model, &output_dir).run(&input).await.unwrap_err();

        assert!(matches!(err, ConvertError::MissingContent));
        assert!(!output_dir.join("jane.html").exists());
    }

    #[tokio::test]
    async fn test_non_json_answer_is_malformed() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("jane.txt");
        std::fs::write(&input, "Jane Doe").unwrap();

        let model = StubModel(Ok("I could not find a resume.".to_string()));
        let err = pipeline(model, dir.path()).run(&input).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Normalize);
    }

    #[tokio::test]
    async fn test_unsupported_input_fails_at_extract() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("jane.docx");
        std::fs::write(&input, "binary").unwrap();

        let model = StubModel(Ok("{}".to_string()));
        let err = pipeline(model, dir.path()).run(&input).await.unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
        assert_eq!(err.stage(), Stage::Extract);
    }
}
