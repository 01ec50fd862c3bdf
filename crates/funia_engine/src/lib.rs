//! Funia engine: client for the PhotoFunia effect service.
//!
//! Pipeline: catalog lookup, image acquisition, multipart upload, result page
//! scraping and, on request, download of the regular-size rendition into a
//! numbered file.
mod catalog;
mod client;
mod config;
mod decode;
mod download;
mod fetch;
mod input;
mod links;
mod persist;
mod submit;
mod types;

use std::path::PathBuf;

pub use catalog::{CatalogError, EffectCatalog, EffectDescriptor};
pub use client::PhotoFunia;
pub use config::{ServiceSettings, DEFAULT_BASE_URL, DEFAULT_OUTPUT_FOLDER, DEFAULT_USER_AGENT};
pub use download::select_regular;
pub use fetch::{FetchOutput, ReqwestFetcher};
pub use input::ImageInput;
pub use links::LinkExtractor;
pub use persist::{
    ensure_output_dir, next_sequence_number, output_file_name, parse_sequence_number,
    NumberedImageWriter, PendingImage, PersistError,
};
pub use types::{EffectError, FailureKind, FetchError, ResultLink};

/// Apply an effect with default settings.
///
/// Builds a fresh client per call; hold a [`PhotoFunia`] to reuse connections.
pub async fn apply_effect(
    effect_name: &str,
    image: impl Into<ImageInput>,
) -> Result<Vec<ResultLink>, EffectError> {
    PhotoFunia::new(ServiceSettings::default())?
        .apply_effect(effect_name, image)
        .await
}

/// Download the regular-size result into `<cwd>/Logos`.
pub async fn download_image(links: &[ResultLink]) -> Result<Option<PathBuf>, EffectError> {
    PhotoFunia::new(ServiceSettings::default())?
        .download_image(links)
        .await
}

/// Whether `name` is an effect in the bundled catalog.
pub fn is_valid(name: &str) -> bool {
    EffectCatalog::builtin().is_valid(name)
}

/// Names of all bundled effects, in catalog order.
pub fn list_effects() -> Vec<String> {
    EffectCatalog::builtin().list_effects()
}
