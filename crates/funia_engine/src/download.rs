use std::path::PathBuf;

use futures_util::StreamExt;
use url::Url;

use funia_logging::{funia_debug, funia_info};

use crate::fetch::{map_reqwest_error, ReqwestFetcher};
use crate::persist::NumberedImageWriter;
use crate::{EffectError, ResultLink};

const REGULAR_SIZE_MARKER: &str = "regular";

/// First link whose label mentions "regular", ignoring case.
pub fn select_regular(links: &[ResultLink]) -> Option<&ResultLink> {
    links
        .iter()
        .find(|link| link.size_label.to_lowercase().contains(REGULAR_SIZE_MARKER))
}

/// Absolute hrefs are used as written; relative ones are joined onto `base`.
fn resolve_link_url(href: &str, base: &Url) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    base.join(href.trim())
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

/// Stream one result into the writer's folder and return the saved path.
///
/// `base` is the service host, used for links the result page gave as paths.
pub(crate) async fn download_link(
    fetcher: &ReqwestFetcher,
    writer: &NumberedImageWriter,
    link: &ResultLink,
    base: &Url,
) -> Result<PathBuf, EffectError> {
    let url = resolve_link_url(&link.url, base);
    funia_debug!("Downloading {:?} from {}", link.size_label, url);
    let mut pending = writer.begin()?;
    let response = fetcher.get(&url).await?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        pending.write_chunk(&chunk).await?;
    }

    let written = pending.bytes_written();
    let path = pending.finish().await?;
    funia_info!("Saved {} ({} bytes) from {}", path.display(), written, url);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_match_is_case_insensitive_substring() {
        let links = vec![
            ResultLink::new("Small", "a"),
            ResultLink::new("Regular Size", "b"),
            ResultLink::new("regular", "c"),
        ];
        assert_eq!(select_regular(&links).map(|l| l.url.as_str()), Some("b"));
    }

    #[test]
    fn relative_link_joins_service_host() {
        let base = Url::parse("https://m.photofunia.com").unwrap();
        assert_eq!(
            resolve_link_url("/results/abc_r.jpg", &base),
            "https://m.photofunia.com/results/abc_r.jpg"
        );
        assert_eq!(
            resolve_link_url("https://cdn.example.com", &base),
            "https://cdn.example.com"
        );
    }

    #[test]
    fn no_regular_label_selects_nothing() {
        assert!(select_regular(&[]).is_none());
        let links = vec![ResultLink::new("Small", "a"), ResultLink::new("Large", "b")];
        assert!(select_regular(&links).is_none());
    }
}
