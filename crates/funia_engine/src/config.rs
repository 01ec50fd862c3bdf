use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://m.photofunia.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
/// Folder under the working directory used when no output dir is configured.
pub const DEFAULT_OUTPUT_FOLDER: &str = "Logos";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Scheme and host of the effect service, without a trailing path.
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Applies to the following client only; uploads never follow redirects.
    pub redirect_limit: usize,
    pub max_page_bytes: u64,
    pub max_image_bytes: u64,
    /// `None` resolves to `<cwd>/Logos` at download time.
    pub output_dir: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_page_bytes: 5 * 1024 * 1024,
            max_image_bytes: 20 * 1024 * 1024,
            output_dir: None,
        }
    }
}

impl ServiceSettings {
    /// Settings pointing at another host, e.g. a local mock of the service.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub(crate) fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Upload endpoint for an effect key.
    pub fn upload_url(&self, key: &str) -> String {
        format!(
            "{}/categories/all_effects/{key}?server=1",
            self.base_url_trimmed()
        )
    }

    pub fn referer(&self) -> String {
        format!("{}/categories/all_effects/calendar", self.base_url_trimmed())
    }

    pub fn resolve_output_dir(&self) -> std::io::Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?.join(DEFAULT_OUTPUT_FOLDER)),
        }
    }
}
