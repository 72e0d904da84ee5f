use gloo_net::http::Request;
use thiserror::Error;

use crate::config::AppConfig;
use crate::types::Slot;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FragmentError {
    #[error("invalid fragment name {0:?}")]
    InvalidToken(String),
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("container #{0} not found")]
    MissingContainer(&'static str),
}

/// Fragment name checked to be a bare `[A-Za-z0-9_-]+` token, so that
/// fragment URLs always stay inside the static asset directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewToken(String);

impl ViewToken {
    pub fn parse(raw: &str) -> Result<Self, FragmentError> {
        let token = raw.trim();
        let valid = !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(FragmentError::InvalidToken(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Component(ViewToken),
    View(ViewToken),
}

impl Fragment {
    pub fn url(&self, config: &AppConfig) -> String {
        match self {
            Fragment::Component(name) => format!("{}/{}.html", config.components_path, name.as_str()),
            Fragment::View(name) => format!("{}/{}.html", config.views_path, name.as_str()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Fragment::Component(name) | Fragment::View(name) => name.as_str(),
        }
    }

    /// Layout fragment for one of the fixed regions.
    pub fn for_layout(slot: Slot) -> Option<Self> {
        let name = slot.component_name()?;
        ViewToken::parse(name).ok().map(Fragment::Component)
    }
}

pub async fn fetch_fragment(url: &str) -> Result<String, FragmentError> {
    let resp = Request::get(url).send().await.map_err(|e| FragmentError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !resp.ok() {
        return Err(FragmentError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    resp.text().await.map_err(|e| FragmentError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches `fragment` and replaces the inner HTML of `slot`'s container.
/// `should_apply` is asked once the body arrives; a `false` drops it.
/// On any failure the container keeps its previous content.
pub async fn load_fragment(
    config: &AppConfig,
    slot: Slot,
    fragment: &Fragment,
    should_apply: impl FnOnce() -> bool,
) -> Result<bool, FragmentError> {
    let url = fragment.url(config);
    let html = fetch_fragment(&url).await?;
    if !should_apply() {
        log::debug!("[fragmento] descartado {url}: hai unha carga máis recente");
        return Ok(false);
    }
    crate::utils::dom::set_inner_html(slot.container_id(), &html)
        .ok_or(FragmentError::MissingContainer(slot.container_id()))?;
    log::info!("[fragmento] {url} → #{}", slot.container_id());
    Ok(true)
}
