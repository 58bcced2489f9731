//! Structured extraction: asks the model to turn resume text into JSON.

use tracing::debug;

use crate::errors::ConvertError;
use crate::llm_client::ChatModel;

/// Sends the extracted text with the system instruction and returns the raw
/// model answer. JSON-ness is not checked here; the sanitizer and normalizer
/// deal with whatever comes back.
pub async fn parse_resume_with_model(
    model: &dyn ChatModel,
    system_prompt: &str,
    resume_text: String,
) -> Result<String, ConvertError> {
    debug!("Requesting structured extraction ({} chars)", resume_text.len());
    let answer = model.complete(system_prompt, &resume_text).await?;
    debug!("Model answered with {} chars", answer.len());
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        seen: Mutex<Vec<(String, String)>>,
        answer: fn() -> Result<String, LlmError>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            (self.answer)()
        }
    }

    #[tokio::test]
    async fn test_prompt_goes_to_system_and_text_to_user() {
        let model = RecordingModel {
            seen: Mutex::new(Vec::new()),
            answer: || Ok("{\"Full Name\":\"A\"}".to_string()),
        };
        let answer = parse_resume_with_model(&model, "INSTRUCTION", "RESUME".to_string())
            .await
            .unwrap();

        assert_eq!(answer, "{\"Full Name\":\"A\"}");
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("INSTRUCTION".to_string(), "RESUME".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_completion_is_missing_content() {
        let model = RecordingModel {
            seen: Mutex::new(Vec::new()),
            answer: || Err(LlmError::EmptyContent),
        };
        let err = parse_resume_with_model(&model, "p", "t".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingContent));
    }
}
