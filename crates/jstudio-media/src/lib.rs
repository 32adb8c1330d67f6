//! Image transfer encoding and watermark compositing.
//!
//! This crate provides:
//! - `image_prep`: base64 transfer encoding and fetching remote assets
//! - `compositor`: deterministic text / logo watermark overlay
//! - `logo`: async logo resolution with typed load errors
//! - `watermarker`: async front door that degrades gracefully on logo failure

pub mod compositor;
pub mod error;
pub mod image_prep;
pub mod logo;
pub mod watermarker;

pub use compositor::{encode_png, CompositedImage, Compositor};
pub use error::{MediaError, MediaResult};
pub use image_prep::{decode, encode, encode_asset, to_data_url, ImageFetcher};
pub use logo::{HttpLogoLoader, LogoLoadError, LogoLoader};
pub use watermarker::{WatermarkedImage, Watermarker};
