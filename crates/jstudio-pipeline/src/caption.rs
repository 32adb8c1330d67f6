//! Social caption generation.

use std::sync::Arc;

use jstudio_genai::{ContentGenerator, GenerateContentRequest};
use jstudio_models::SocialLanguage;
use tracing::{debug, info};

use crate::error::PipelineResult;
use crate::prompt::caption_prompt;

/// Returned when the model produces no text.
pub const FALLBACK_CAPTION: &str = "Check out our latest collection! #jewelry #luxury";

pub struct CaptionWriter {
    generator: Arc<dyn ContentGenerator>,
    model: String,
}

impl CaptionWriter {
    pub fn new(generator: Arc<dyn ContentGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Write a caption for a photo described by `image_prompt`.
    pub async fn write(
        &self,
        image_prompt: &str,
        store_name: Option<&str>,
        language: SocialLanguage,
    ) -> PipelineResult<String> {
        let request = GenerateContentRequest::text(caption_prompt(image_prompt, store_name, language));
        let response = self.generator.generate_content(&self.model, &request).await?;

        let text = response.text();
        let caption = text.trim();
        if caption.is_empty() {
            debug!(language = %language, "Empty caption from model, using fallback");
            return Ok(FALLBACK_CAPTION.to_string());
        }

        info!(language = %language, chars = caption.chars().count(), "Caption generated");
        Ok(caption.to_string())
    }
}

impl std::fmt::Debug for CaptionWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionWriter")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jstudio_genai::types::{Candidate, Content, Part};
    use jstudio_genai::{GenAiError, GenAiResult, GenerateContentResponse};
    use std::sync::Mutex;

    struct Scripted {
        reply: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentGenerator for Scripted {
        async fn generate_content(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> GenAiResult<GenerateContentResponse> {
            let prompt = request.contents[0].parts[0].text.clone().unwrap_or_default();
            self.seen.lock().unwrap().push(format!("{}|{}", model, prompt));
            match &self.reply {
                Some(text) => Ok(GenerateContentResponse {
                    candidates: vec![Candidate {
                        content: Some(Content {
                            role: Some("model".into()),
                            parts: vec![Part::text(text.clone())],
                        }),
                        finish_reason: Some("STOP".into()),
                    }],
                    prompt_feedback: None,
                }),
                None => Err(GenAiError::from_http_status(500, "down")),
            }
        }
    }

    fn writer(reply: Option<&str>) -> (CaptionWriter, Arc<Scripted>) {
        let backend = Arc::new(Scripted {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        });
        (CaptionWriter::new(backend.clone(), "gemini-2.5-flash"), backend)
    }

    #[tokio::test]
    async fn test_caption_uses_text_model_and_language() {
        let (writer, backend) = writer(Some("  Shine bright ✨ #gold  "));
        let caption = writer
            .write("gold ring on hand", Some("Maison Or"), SocialLanguage::English)
            .await
            .unwrap();
        assert_eq!(caption, "Shine bright ✨ #gold");

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].starts_with("gemini-2.5-flash|"));
        assert!(seen[0].contains("Language: English"));
        assert!(seen[0].contains("Maison Or"));
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let (writer, _) = writer(Some("   "));
        let caption = writer.write("x", None, SocialLanguage::Hebrew).await.unwrap();
        assert_eq!(caption, FALLBACK_CAPTION);
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let (writer, _) = writer(None);
        assert!(writer.write("x", None, SocialLanguage::Arabic).await.is_err());
    }
}
