//! `jstudio` command-line front end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use jstudio_genai::GeminiClient;
use jstudio_media::image_prep::sniff_media_type;
use jstudio_models::{
    GenerationRequest, ImageAspectRatio, Profile, SocialLanguage, SourceAsset, VideoAspectRatio,
    WatermarkPosition, WatermarkSpec,
};
use jstudio_pipeline::logging::init_tracing;
use jstudio_pipeline::{CancelSource, PipelineConfig, PipelineError, Studio};
use jstudio_profile::{InMemoryProfileStore, ProfileStore};

#[derive(Debug, Parser)]
#[command(name = "jstudio", version, about = "AI jewelry photoshoots and product videos")]
struct Cli {
    /// Profile to charge credits against
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Credits granted to the local profile
    #[arg(long, global = true, default_value_t = 10)]
    credits: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a three-angle model photoshoot
    Photo {
        image: PathBuf,
        #[arg(long, short)]
        description: String,
        #[arg(long, default_value = "1:1")]
        aspect: ImageAspectRatio,
        /// Location photo to composite the model into
        #[arg(long)]
        background: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Watermark text (defaults to the studio setting)
        #[arg(long)]
        watermark: Option<String>,
        /// Logo path or URL; switches the watermark to logo mode
        #[arg(long, conflicts_with = "watermark")]
        logo: Option<String>,
        #[arg(long)]
        position: Option<WatermarkPosition>,
        #[arg(long)]
        no_watermark: bool,
    },
    /// Animate a product photo into a short video
    Video {
        image: PathBuf,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long, default_value = "9:16")]
        aspect: VideoAspectRatio,
        #[arg(long, default_value = "jstudio-video.mp4")]
        out: PathBuf,
    },
    /// Write a social caption for a photo description
    Caption {
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "Hebrew")]
        language: SocialLanguage,
        #[arg(long)]
        store_name: Option<String>,
    },
    /// Download one of the configured example photos
    Example {
        label: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(cli.user.clone(), Profile::with_credits(cli.credits)).await;

    let config = PipelineConfig::from_env();
    let client = Arc::new(GeminiClient::from_env().context("backend client configuration")?);
    info!(config = ?client.config(), "Backend client ready");

    let studio = Studio::from_client(client, store.clone(), &config)?;

    match cli.command {
        Command::Photo {
            image,
            description,
            aspect,
            background,
            out,
            watermark,
            logo,
            position,
            no_watermark,
        } => {
            let mut request = GenerationRequest::new(read_image(&image).await?, description)
                .with_aspect_ratio(aspect);
            if let Some(path) = background {
                request = request.with_background(read_image(&path).await?);
            }

            let mut spec = studio.studio_config().await?.watermark;
            if let Some(text) = watermark {
                spec = WatermarkSpec::text(text, spec.position);
            }
            if let Some(logo) = logo {
                spec = WatermarkSpec::logo(logo, spec.position);
            }
            if let Some(position) = position {
                spec.position = position;
            }
            if no_watermark {
                spec = WatermarkSpec::disabled();
            }

            let result = studio.photoshoot(&cli.user, &request, &spec).await?;
            tokio::fs::create_dir_all(&out).await?;
            for image in &result.images {
                let path = out.join(image.download_name());
                tokio::fs::write(&path, image.display_bytes()).await?;
                println!("{}  {}", image.angle, path.display());
            }
            for failure in &result.failures {
                warn!(angle = %failure.angle, reason = %failure.reason, "Angle not generated");
            }
            println!("{}", result.summary());
        }
        Command::Video {
            image,
            prompt,
            aspect,
            out,
        } => {
            let source = read_image(&image).await?;
            let cancel = CancelSource::new();
            let token = cancel.token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received interrupt, cancelling video generation");
                    cancel.cancel();
                }
            });

            match studio
                .animate(&cli.user, &source, prompt.as_deref(), aspect, &token)
                .await
            {
                Ok(video) => {
                    let path = video.persist(&out)?;
                    println!("{}", path.display());
                }
                Err(PipelineError::Cancelled) => {
                    println!("Cancelled");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Caption {
            prompt,
            language,
            store_name,
        } => {
            if let Some(name) = store_name {
                let mut studio_config = store.load_config().await?;
                studio_config.store_name = name;
                store.save_config(&studio_config).await?;
            }
            println!("{}", studio.caption(&prompt, language).await?);
        }
        Command::Example { label, out } => {
            let studio_config = studio.studio_config().await?;
            let Some(example) = studio_config
                .examples
                .iter()
                .find(|e| e.label.eq_ignore_ascii_case(&label))
            else {
                bail!("no example named '{}'", label);
            };
            let asset = studio.load_example(example).await?;
            tokio::fs::create_dir_all(&out).await?;
            let path = out.join(example.file_name());
            tokio::fs::write(&path, asset.bytes()).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

async fn read_image(path: &Path) -> Result<SourceAsset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let media_type = sniff_media_type(&bytes)
        .with_context(|| format!("{} is not a recognised image", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SourceAsset::new(bytes, media_type).with_name(name))
}
