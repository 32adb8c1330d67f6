//! Prompt construction for photoshoot, caption and video calls.

use jstudio_genai::{GenerateContentRequest, Part};
use jstudio_media::encode_asset;
use jstudio_models::{AngleSpec, GenerationRequest, SocialLanguage};

use crate::error::PipelineResult;

/// Used when the caller supplies no video prompt.
pub const DEFAULT_VIDEO_PROMPT: &str =
    "Cinematic product showcase, elegant camera movement, sparkling lighting";

/// Store name used in captions when none is configured.
pub const FALLBACK_STORE_NAME: &str = "our brand";

/// Photoshoot prompt for one angle.
pub fn angle_prompt(description: &str, angle: &AngleSpec, with_background: bool) -> String {
    let mut prompt = format!(
        "You are a professional jewelry photographer and editor.\n\
         I have uploaded an image of a piece of jewelry.\n\n\
         Task: Generate a photorealistic image of a model wearing this EXACT piece of jewelry.\n\
         Model Description: {}.\n\
         Shot Type: {}.\n",
        description.trim(),
        angle.prompt_suffix
    );

    if with_background {
        prompt.push_str(
            "\nI have also uploaded a background image.\n\
             CONTEXT: The user wants the model to appear in this specific location (e.g. their store or a specific venue).\n\n\
             REQUIREMENTS:\n\
             1. Use the provided background image as the environment/setting for the photoshoot.\n\
             2. Composite the model seamlessly into this background.\n\
             3. CRITICAL: Maintain the perspective, lighting direction, and atmosphere of the background image to ensure realism.\n\
             4. Do not just paste the model; blend shadows and reflections so it looks like the photo was taken there.\n",
        );
    } else {
        prompt.push_str(
            "\nBackground: Create a setting that matches the model description (e.g., studio, outdoors, luxury interior).\n",
        );
    }

    prompt.push_str(
        "\nCRITICAL PRODUCT REQUIREMENTS:\n\
         1. The jewelry in the output MUST look exactly like the provided input jewelry image. Do not alter the design, gems, or metal of the jewelry.\n\
         2. High resolution, professional fashion magazine quality.\n",
    );
    prompt
}

/// Request inputs encoded once and shared by every angle call.
#[derive(Debug, Clone)]
pub struct EncodedInputs {
    source: Part,
    background: Option<Part>,
    description: String,
    aspect_ratio: String,
}

impl EncodedInputs {
    pub fn from_request(request: &GenerationRequest) -> PipelineResult<Self> {
        let source = Part::inline(request.source.media_type(), encode_asset(&request.source)?);
        let background = request
            .usable_background()
            .map(|bg| encode_asset(bg).map(|data| Part::inline(bg.media_type(), data)))
            .transpose()?;

        Ok(Self {
            source,
            background,
            description: request.description.clone(),
            aspect_ratio: request.aspect_ratio.as_str().to_string(),
        })
    }

    /// Parts in order: product image, optional background, prompt text.
    pub fn angle_request(&self, angle: &AngleSpec) -> GenerateContentRequest {
        let prompt = angle_prompt(&self.description, angle, self.background.is_some());

        let mut parts = Vec::with_capacity(3);
        parts.push(self.source.clone());
        if let Some(background) = &self.background {
            parts.push(background.clone());
        }
        parts.push(Part::text(prompt));

        GenerateContentRequest::from_parts(parts).with_image_aspect_ratio(self.aspect_ratio.clone())
    }
}

/// Brand-voice caption prompt.
pub fn caption_prompt(image_prompt: &str, store_name: Option<&str>, language: SocialLanguage) -> String {
    let store_name = store_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STORE_NAME);

    format!(
        "You are a social media manager for a jewelry brand named \"{store_name}\".\n\
         Write a short, engaging, and elegant Instagram caption for a photo with this description:\n\
         \"{image_prompt}\"\n\n\
         Requirements:\n\
         - Language: {language} (Write ONLY in this language).\n\
         - Tone: Sophisticated, Luxury, Engaging.\n\
         - Include 5 relevant hashtags in the same language.\n\
         - Include call to action (Link in bio).\n\
         - Use emojis sparingly but effectively.\n\
         - KEEP IT UNDER 50 WORDS (excluding hashtags).\n"
    )
}

/// Video prompt, substituting the default for blank input.
pub fn video_prompt(prompt: Option<&str>) -> &str {
    prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_VIDEO_PROMPT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstudio_models::{ImageAspectRatio, SourceAsset, ANGLES};

    fn request() -> GenerationRequest {
        GenerationRequest::new(SourceAsset::new(vec![1, 2, 3], "image/jpeg"), "Elegant woman")
            .with_aspect_ratio(ImageAspectRatio::Portrait)
    }

    #[test]
    fn test_angle_prompt_sections() {
        let prompt = angle_prompt("Elegant woman", &ANGLES[0], false);
        assert!(prompt.contains("Model Description: Elegant woman."));
        assert!(prompt.contains(&format!("Shot Type: {}.", ANGLES[0].prompt_suffix)));
        assert!(prompt.contains("Background: Create a setting"));
        assert!(!prompt.contains("background image"));
        assert!(prompt.contains("CRITICAL PRODUCT REQUIREMENTS"));
    }

    #[test]
    fn test_parts_order_without_background() {
        let inputs = EncodedInputs::from_request(&request()).unwrap();
        let req = inputs.angle_request(&ANGLES[1]);
        let parts = &req.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].inline_data.as_ref().unwrap().mime_type, "image/jpeg");
        assert_eq!(parts[0].inline_data.as_ref().unwrap().data, "AQID");
        assert!(parts[1].text.as_ref().unwrap().contains("Full body"));
        assert_eq!(
            req.generation_config.unwrap().image_config.unwrap().aspect_ratio,
            "3:4"
        );
    }

    #[test]
    fn test_parts_order_with_background() {
        let req = request().with_background(SourceAsset::new(vec![9], "image/png"));
        let inputs = EncodedInputs::from_request(&req).unwrap();
        let parts = inputs.angle_request(&ANGLES[2]).contents.remove(0).parts;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
        assert!(parts[2].text.as_ref().unwrap().contains("Composite the model seamlessly"));
    }

    #[test]
    fn test_empty_background_ignored() {
        let req = request().with_background(SourceAsset::new(Vec::<u8>::new(), "image/png"));
        let inputs = EncodedInputs::from_request(&req).unwrap();
        assert_eq!(inputs.angle_request(&ANGLES[0]).contents[0].parts.len(), 2);
    }

    #[test]
    fn test_caption_prompt() {
        let prompt = caption_prompt("gold ring", None, SocialLanguage::Arabic);
        assert!(prompt.contains("\"our brand\""));
        assert!(prompt.contains("Language: Arabic"));
        assert!(prompt.contains("\"gold ring\""));

        let named = caption_prompt("x", Some("Maison Or"), SocialLanguage::Hebrew);
        assert!(named.contains("\"Maison Or\""));
    }

    #[test]
    fn test_video_prompt_default() {
        assert_eq!(video_prompt(None), DEFAULT_VIDEO_PROMPT);
        assert_eq!(video_prompt(Some("   ")), DEFAULT_VIDEO_PROMPT);
        assert_eq!(video_prompt(Some(" spin ")), "spin");
    }
}
