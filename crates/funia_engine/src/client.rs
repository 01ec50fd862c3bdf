use std::path::PathBuf;
use std::sync::Arc;

use funia_logging::{funia_debug, funia_info};

use crate::catalog::EffectCatalog;
use crate::config::ServiceSettings;
use crate::download::{download_link, select_regular};
use crate::fetch::{parse_http_url, ReqwestFetcher};
use crate::input::{acquire_image, ImageInput};
use crate::links::{fetch_result_links, LinkExtractor};
use crate::persist::NumberedImageWriter;
use crate::submit::upload_image;
use crate::{EffectError, FetchError, ResultLink};

/// Handle to the effect service.
///
/// Cheap to clone; clones share the catalog, HTTP connection pools and link
/// extractor. Calls are independent of each other.
#[derive(Clone)]
pub struct PhotoFunia {
    inner: Arc<Inner>,
}

struct Inner {
    settings: ServiceSettings,
    catalog: Arc<EffectCatalog>,
    fetcher: ReqwestFetcher,
    extractor: LinkExtractor,
}

impl PhotoFunia {
    /// Client over the bundled effect catalog.
    pub fn new(settings: ServiceSettings) -> Result<Self, FetchError> {
        Self::with_catalog(settings, EffectCatalog::builtin())
    }

    pub fn with_catalog(
        settings: ServiceSettings,
        catalog: Arc<EffectCatalog>,
    ) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(&settings)?;
        Ok(Self {
            inner: Arc::new(Inner {
                settings,
                catalog,
                fetcher,
                extractor: LinkExtractor::new(),
            }),
        })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.inner.settings
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.inner.catalog
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.inner.catalog.is_valid(name)
    }

    pub fn list_effects(&self) -> Vec<String> {
        self.inner.catalog.list_effects()
    }

    /// Apply `effect_name` to an image and return the size links of the result.
    ///
    /// An effect missing from the catalog yields an empty list and no request
    /// is made.
    pub async fn apply_effect(
        &self,
        effect_name: &str,
        image: impl Into<ImageInput>,
    ) -> Result<Vec<ResultLink>, EffectError> {
        let inner = &self.inner;
        let Some(effect) = inner.catalog.get(effect_name) else {
            funia_debug!("Unknown effect {:?}; nothing to apply", effect_name);
            return Ok(Vec::new());
        };

        let image = acquire_image(
            &inner.fetcher,
            image.into(),
            inner.settings.max_image_bytes,
        )
        .await?;
        let result_url = upload_image(&inner.fetcher, &inner.settings, &effect.key, image).await?;
        let links = fetch_result_links(
            &inner.fetcher,
            &inner.extractor,
            &result_url,
            inner.settings.max_page_bytes,
        )
        .await?;

        funia_info!(
            "Effect {:?} produced {} result links",
            effect.unique_name,
            links.len()
        );
        Ok(links)
    }

    /// Save the regular-size result into the output folder.
    ///
    /// A link given as a bare path is fetched from the service host.
    ///
    /// Returns `Ok(None)` when no link is labelled regular.
    pub async fn download_image(
        &self,
        links: &[ResultLink],
    ) -> Result<Option<PathBuf>, EffectError> {
        let Some(link) = select_regular(links) else {
            funia_debug!("No regular-size link among {} results", links.len());
            return Ok(None);
        };
        let dir = self
            .inner
            .settings
            .resolve_output_dir()
            .map_err(|err| EffectError::Write(err.into()))?;
        let base = parse_http_url(self.inner.settings.base_url_trimmed())?;
        let writer = NumberedImageWriter::new(dir);
        let path = download_link(&self.inner.fetcher, &writer, link, &base).await?;
        Ok(Some(path))
    }
}

impl std::fmt::Debug for PhotoFunia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoFunia")
            .field("settings", &self.inner.settings)
            .field("effects", &self.inner.catalog.len())
            .finish()
    }
}
