use scraper::{Html, Selector};
use url::Url;

use funia_logging::funia_debug;

use crate::decode::decode_page;
use crate::fetch::ReqwestFetcher;
use crate::{EffectError, ResultLink};

/// Anchors of the "available sizes" list on a result page.
const SIZE_LINKS_SELECTOR: &str = "ul.images li a";

/// Pulls size links out of a result page.
pub struct LinkExtractor {
    selector: Selector,
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self::with_selector(SIZE_LINKS_SELECTOR).expect("size link selector")
    }

    /// Use a different CSS selector for the size anchors.
    /// Returns `None` if `selector` does not parse.
    pub fn with_selector(selector: &str) -> Option<Self> {
        Selector::parse(selector).ok().map(|selector| Self { selector })
    }

    /// Every matching anchor with an `href`, in document order.
    /// The `href` is returned exactly as written.
    pub fn extract(&self, html: &str) -> Vec<ResultLink> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let size_label = anchor.text().collect::<String>().trim().to_string();
                Some(ResultLink {
                    size_label,
                    url: href.to_string(),
                })
            })
            .collect()
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch a result page and extract its size links.
pub(crate) async fn fetch_result_links(
    fetcher: &ReqwestFetcher,
    extractor: &LinkExtractor,
    result_url: &Url,
    max_bytes: u64,
) -> Result<Vec<ResultLink>, EffectError> {
    let page = fetcher.fetch(result_url.as_str(), max_bytes).await?;
    let html = decode_page(&page.bytes, page.content_type.as_deref());
    let links = extractor.extract(&html);
    funia_debug!("Found {} size links on {}", links.len(), page.final_url);
    Ok(links)
}
