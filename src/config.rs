pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const API_BASE_META: &str = "atopcar-api-base";

/// Runtime settings. Read once by `App` and handed to the click listener.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub components_path: String,
    pub views_path: String,
    pub default_view: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            components_path: "components".to_string(),
            views_path: "views".to_string(),
            default_view: "inicio".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the API base taken from
    /// `<meta name="atopcar-api-base">` when the page declares one.
    pub fn from_document() -> Self {
        let meta = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| {
                doc.query_selector(&format!("meta[name=\"{API_BASE_META}\"]"))
                    .ok()
                    .flatten()
            })
            .and_then(|el| el.get_attribute("content"));
        Self::default().with_api_base(meta.as_deref())
    }

    pub fn with_api_base(mut self, base: Option<&str>) -> Self {
        if let Some(base) = base.map(|b| b.trim().trim_end_matches('/')) {
            if !base.is_empty() {
                self.api_base = base.to_string();
            }
        }
        self
    }
}
