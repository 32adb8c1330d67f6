//! `Studio`: the entry point a UI or CLI drives.
//!
//! Wires the showcase orchestrator, video poller, watermark stage and
//! caption writer behind the credit gate. One credit is spent per
//! successful photoshoot or video; failures never charge.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use jstudio_genai::{ContentGenerator, GeminiClient, VideoGenerator};
use jstudio_media::{Compositor, HttpLogoLoader, ImageFetcher, Watermarker};
use jstudio_models::{
    ExampleAsset, GenerationMode, GenerationRequest, ShowcaseResult, SocialLanguage, SourceAsset,
    StudioConfig, VideoAspectRatio, WatermarkSpec,
};
use jstudio_profile::{CreditGate, ProfileError, ProfileStore};
use tracing::{info, info_span, warn, Instrument};

use crate::cancel::CancelToken;
use crate::caption::CaptionWriter;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::record_generation_latency;
use crate::showcase::ShowcaseOrchestrator;
use crate::video::{GeneratedVideo, VideoOperationPoller};
use crate::watermark_stage::WatermarkStage;

pub struct Studio {
    showcase: ShowcaseOrchestrator,
    video: VideoOperationPoller,
    watermark: WatermarkStage,
    captions: CaptionWriter,
    gate: CreditGate,
    store: Arc<dyn ProfileStore>,
    fetcher: ImageFetcher,
}

impl Studio {
    pub fn new(
        showcase: ShowcaseOrchestrator,
        video: VideoOperationPoller,
        watermark: WatermarkStage,
        captions: CaptionWriter,
        store: Arc<dyn ProfileStore>,
        fetcher: ImageFetcher,
    ) -> Self {
        Self {
            showcase,
            video,
            watermark,
            captions,
            gate: CreditGate::new(Arc::clone(&store)),
            store,
            fetcher,
        }
    }

    /// Build a studio over backend traits with the default compositor and logo loader.
    pub fn with_backends(
        content: Arc<dyn ContentGenerator>,
        video: Arc<dyn VideoGenerator>,
        store: Arc<dyn ProfileStore>,
        config: &PipelineConfig,
    ) -> PipelineResult<Self> {
        let fetcher = ImageFetcher::new(config.fetch_timeout)?;
        let watermarker = Watermarker::new(
            Arc::new(Compositor::new()),
            Arc::new(HttpLogoLoader::with_fetcher(fetcher.clone())),
        );

        Ok(Self::new(
            ShowcaseOrchestrator::from_config(Arc::clone(&content), config),
            VideoOperationPoller::from_config(video, config),
            WatermarkStage::new(watermarker),
            CaptionWriter::new(content, config.text_model.clone()),
            store,
            fetcher,
        ))
    }

    /// Build a studio backed by one Gemini client.
    pub fn from_client(
        client: Arc<GeminiClient>,
        store: Arc<dyn ProfileStore>,
        config: &PipelineConfig,
    ) -> PipelineResult<Self> {
        let config = config.clone().with_models(client.config());
        Self::with_backends(client.clone(), client, store, &config)
    }

    /// Current studio configuration from the profile store.
    pub async fn studio_config(&self) -> PipelineResult<StudioConfig> {
        Ok(self.store.load_config().await?)
    }

    /// Reject `mode` when the studio configuration switches it off.
    async fn ensure_enabled(&self, mode: GenerationMode) -> PipelineResult<()> {
        let config = self.store.load_config().await?;
        if !config.features.allows(mode) {
            warn!(mode = %mode, "Generation mode disabled by studio configuration");
            return Err(ProfileError::FeatureDisabled { mode }.into());
        }
        Ok(())
    }

    /// Generate a watermarked photoshoot for `user_id`.
    pub async fn photoshoot(
        &self,
        user_id: &str,
        request: &GenerationRequest,
        watermark: &WatermarkSpec,
    ) -> PipelineResult<ShowcaseResult> {
        let span = info_span!("photoshoot", user_id = %user_id);
        async {
            self.ensure_enabled(GenerationMode::Photo).await?;
            self.gate.check(user_id, GenerationMode::Photo, Utc::now()).await?;

            let started = Instant::now();
            let mut result = self.showcase.generate(request).await?;
            result.images = self.watermark.apply(result.images, watermark).await;
            record_generation_latency(GenerationMode::Photo, started.elapsed());

            self.gate.charge_success(user_id).await;
            info!(summary = %result.summary(), "Photoshoot complete");
            Ok::<_, PipelineError>(result)
        }
        .instrument(span)
        .await
    }

    /// Generate a short video from `image`.
    pub async fn animate(
        &self,
        user_id: &str,
        image: &SourceAsset,
        prompt: Option<&str>,
        aspect_ratio: VideoAspectRatio,
        cancel: &CancelToken,
    ) -> PipelineResult<GeneratedVideo> {
        let span = info_span!("animate", user_id = %user_id, aspect_ratio = %aspect_ratio);
        async {
            if image.is_empty() || !image.is_image() {
                return Err(PipelineError::invalid_request("source must be a non-empty image"));
            }
            self.ensure_enabled(GenerationMode::Video).await?;
            self.gate.check(user_id, GenerationMode::Video, Utc::now()).await?;

            let started = Instant::now();
            let video = self.video.generate(image, prompt, aspect_ratio, cancel).await?;
            record_generation_latency(GenerationMode::Video, started.elapsed());

            self.gate.charge_success(user_id).await;
            Ok::<_, PipelineError>(video)
        }
        .instrument(span)
        .await
    }

    /// Caption a photo in the store's voice.
    pub async fn caption(&self, image_prompt: &str, language: SocialLanguage) -> PipelineResult<String> {
        let config = self.store.load_config().await?;
        self.captions
            .write(image_prompt, Some(&config.store_name), language)
            .await
    }

    /// Fetch a configured example product photo.
    pub async fn load_example(&self, example: &ExampleAsset) -> PipelineResult<SourceAsset> {
        if !self.store.load_config().await?.features.show_examples {
            return Err(PipelineError::ExamplesHidden);
        }
        if !example.has_valid_url() {
            return Err(PipelineError::invalid_request(format!(
                "example '{}' has no valid URL",
                example.label
            )));
        }
        Ok(self
            .fetcher
            .fetch_as_file(&example.url, &example.file_name())
            .await?)
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("video", &self.video)
            .field("captions", &self.captions)
            .finish_non_exhaustive()
    }
}
