use urlencoding::{decode, encode};
use wasm_bindgen::JsValue;

const VIEW_PARAM: &str = "view";

/// Value of `view` in a `?a=b&view=c` query string.
pub fn view_from_query(search: &str) -> Option<String> {
    search
        .strip_prefix('?')
        .unwrap_or(search)
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or_default();
            if key == VIEW_PARAM {
                decode(value).ok().map(|cow| cow.into_owned())
            } else {
                None
            }
        })
        .find(|view| !view.is_empty())
}

pub fn read_view_from_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    view_from_query(&search)
}

/// Query string with `view` set to `view` (or removed for `None`). Other
/// parameters are kept as they are, in their original order.
pub fn query_with_view(search: &str, view: Option<&str>) -> String {
    let encoded = view
        .filter(|v| !v.is_empty())
        .map(|v| format!("{VIEW_PARAM}={}", encode(v)));
    let mut pairs: Vec<&str> = search
        .strip_prefix('?')
        .unwrap_or(search)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(VIEW_PARAM))
        .collect();
    if let Some(param) = encoded.as_deref() {
        pairs.push(param);
    }
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Rewrites the current history entry so a reload reopens `view`.
pub fn sync_view_in_url(view: Option<&str>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let Ok(mut url) = location.pathname() else {
        return;
    };
    let search = location.search().unwrap_or_default();
    url.push_str(&query_with_view(&search, view));
    if let Ok(hash) = location.hash() {
        url.push_str(&hash);
    }
    match window.history() {
        Ok(history) => {
            if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
                log::debug!("[navegación] replaceState {url}: {e:?}");
            }
        }
        Err(e) => log::debug!("[navegación] sen history: {e:?}"),
    }
}
