use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api::HttpApi;
use crate::config::AppConfig;
use crate::fragments::{load_fragment, Fragment, ViewToken};
use crate::locator::{locate, LocateOutcome};
use crate::state::{Ticket, ViewState};
use crate::types::Slot;
use crate::utils::{dom, url};

pub const VIEW_ATTR: &str = "data-view";
pub const TOGGLE_ID: &str = "toggleSidebar";
pub const SEARCH_TRIGGER_ID: &str = "buscarVehiculo";
pub const SEARCH_INPUT_ID: &str = "busquedaVehiculo";

/// What a click means to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    ToggleSidebar,
    Search,
}

/// One element on the way from the click target up to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNode {
    pub id: Option<String>,
    pub view: Option<String>,
}

/// Click target first, then its ancestors.
pub type ClickPath = Vec<PathNode>;

type Matcher = fn(&[PathNode]) -> Option<Action>;

/// Checked in order; the first match is the only action taken.
const DISPATCH: [(&str, Matcher); 3] = [
    ("navegación", match_navigate),
    ("barra", match_toggle),
    ("busca", match_search),
];

pub fn classify(path: &[PathNode]) -> Option<Action> {
    DISPATCH.iter().find_map(|(_, matcher)| matcher(path))
}

fn match_navigate(path: &[PathNode]) -> Option<Action> {
    path.iter()
        .find_map(|node| node.view.clone())
        .map(Action::Navigate)
}

fn match_toggle(path: &[PathNode]) -> Option<Action> {
    path.iter()
        .any(|node| node.id.as_deref() == Some(TOGGLE_ID))
        .then_some(Action::ToggleSidebar)
}

fn match_search(path: &[PathNode]) -> Option<Action> {
    path.first()
        .filter(|node| node.id.as_deref() == Some(SEARCH_TRIGGER_ID))
        .map(|_| Action::Search)
}

/// Summarises the target's ancestor chain for `classify`.
pub fn click_path(event: &web_sys::Event) -> ClickPath {
    let mut path = ClickPath::new();
    let mut current = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok());
    while let Some(el) = current {
        let id = el.id();
        path.push(PathNode {
            id: (!id.is_empty()).then_some(id),
            view: el.get_attribute(VIEW_ATTR),
        });
        current = el.parent_element();
    }
    path
}

/// Document-level click listener body.
///
/// The click is resolved through `classify` to at most one action; clicks
/// that match nothing are left to the browser.
///
/// # Parameters
/// - `event`: the click delivered to `document`
/// - `state`: page state; every action goes through it so the reconcile
///   effect can redraw the DOM
/// - `config`: API base and fragment directories
pub fn handle_click(event: &web_sys::MouseEvent, state: RwSignal<ViewState>, config: &AppConfig) {
    let Some(action) = classify(&click_path(event)) else {
        return;
    };
    match action {
        Action::Navigate(view) => {
            event.prevent_default();
            // Remember which link was clicked, not only which view it names.
            let ordinal = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| dom::view_link_ordinal(&el));
            navigate(&view, ordinal, state, config);
        }
        Action::ToggleSidebar => {
            if let Some(collapsed) = state.try_update(ViewState::toggle_sidebar) {
                log::info!("[barra] contraída: {collapsed}");
            }
        }
        Action::Search => search(state, config),
    }
}

/// Switches main content to `view` and marks the clicked link as active.
///
/// # Parameters
/// - `view`: raw `data-view` value; it is trimmed and validated, and an
///   invalid value is logged and ignored
/// - `ordinal`: position of the clicked link among `[data-view]` elements
/// - `state`: page state
/// - `config`: fragment directories
pub fn navigate(
    view: &str,
    ordinal: Option<usize>,
    state: RwSignal<ViewState>,
    config: &AppConfig,
) {
    let token = match ViewToken::parse(view) {
        Ok(token) => token,
        Err(e) => {
            log::warn!("[navegación] {e}");
            return;
        }
    };
    // The active link is set right away; the fragment follows when it arrives.
    let Some(ticket) = state.try_update(|s| s.navigate(token.as_str(), ordinal)) else {
        return;
    };
    log::info!("[navegación] vista {} (ligazón {ordinal:?})", token.as_str());
    url::sync_view_in_url(Some(token.as_str()));
    load_view(token, ticket, state, config.clone());
}

/// Loads a view into main content without touching the active link.
pub fn show_view(view: &str, state: RwSignal<ViewState>, config: &AppConfig) {
    match ViewToken::parse(view) {
        Ok(token) => {
            if let Some(ticket) = state.try_update(ViewState::begin_view_load) {
                load_view(token, ticket, state, config.clone());
            }
        }
        Err(e) => log::warn!("[navegación] {e}"),
    }
}

/// Fetches a view into main content. The body is injected only if no newer
/// view was requested meanwhile.
fn load_view(token: ViewToken, ticket: Ticket, state: RwSignal<ViewState>, config: AppConfig) {
    spawn_local(async move {
        let fragment = Fragment::View(token);
        let is_current = move || {
            state
                .try_with_untracked(|s| s.is_current_view_load(ticket))
                .unwrap_or(false)
        };
        match load_fragment(&config, Slot::Main, &fragment, is_current).await {
            Ok(true) => state.update(|s| s.bind(Slot::Main, fragment.name())),
            Ok(false) => {}
            Err(e) => log::warn!("[fragmento] {e}"),
        }
    });
}

/// Fills the sidebar, header and footer containers. Runs once at startup.
pub fn load_layout(state: RwSignal<ViewState>, config: &AppConfig) {
    for slot in Slot::LAYOUT {
        let Some(fragment) = Fragment::for_layout(slot) else {
            continue;
        };
        let config = config.clone();
        spawn_local(async move {
            match load_fragment(&config, slot, &fragment, || true).await {
                Ok(_) => state.update(|s| s.bind(slot, fragment.name())),
                Err(e) => log::warn!("[fragmento] {e}"),
            }
        });
    }
}

/// Reads the search box and runs the vehicle lookup.
///
/// Each stage reported by `locate` is applied under the search's ticket,
/// so a newer search (or an empty one) silences this one.
///
/// # Parameters
/// - `state`: page state holding the result text and the marker
/// - `config`: API base for `HttpApi`
pub fn search(state: RwSignal<ViewState>, config: &AppConfig) {
    // A missing input counts as an empty term.
    let raw = dom::input_value(SEARCH_INPUT_ID).unwrap_or_default();
    let Some((ticket, term)) = state.try_update(|s| s.begin_search(&raw)).flatten() else {
        log::debug!("[busca] termo baleiro");
        return;
    };
    let api = HttpApi::new(config.api_base.clone());
    spawn_local(async move {
        log::info!("[busca] #{ticket} \"{term}\"");
        let outcome = locate(&api, &term, |update| {
            let applied = state
                .try_update(|s| s.apply_search(ticket, update))
                .unwrap_or(false);
            if !applied {
                log::debug!("[busca] #{ticket} superada por unha busca máis nova");
            }
        })
        .await;
        match outcome {
            LocateOutcome::Failed { stage, error } => {
                log::warn!("[busca] #{ticket} fallou en {stage}: {error}")
            }
            other => log::info!("[busca] #{ticket} rematada: {other:?}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: Option<&str>, view: Option<&str>) -> PathNode {
        PathNode {
            id: id.map(str::to_string),
            view: view.map(str::to_string),
        }
    }

    #[test]
    fn link_child_resolves_to_its_view() {
        let path = vec![
            node(None, None),
            node(None, Some("vehiculos")),
            node(Some("sidebar"), None),
        ];
        assert_eq!(classify(&path), Some(Action::Navigate("vehiculos".into())));
    }

    #[test]
    fn nearest_view_link_wins() {
        let path = vec![node(None, Some("interior")), node(None, Some("exterior"))];
        assert_eq!(classify(&path), Some(Action::Navigate("interior".into())));
    }

    #[test]
    fn toggle_matches_self_and_descendants() {
        assert_eq!(classify(&[node(Some(TOGGLE_ID), None)]), Some(Action::ToggleSidebar));
        let icon = vec![node(Some("icona"), None), node(Some(TOGGLE_ID), None)];
        assert_eq!(classify(&icon), Some(Action::ToggleSidebar));
    }

    #[test]
    fn search_requires_exact_target() {
        assert_eq!(classify(&[node(Some(SEARCH_TRIGGER_ID), None)]), Some(Action::Search));
        let inner = vec![node(None, None), node(Some(SEARCH_TRIGGER_ID), None)];
        assert_eq!(classify(&inner), None);
    }

    #[test]
    fn only_first_matching_action_runs() {
        let path = vec![node(Some(TOGGLE_ID), Some("inicio"))];
        assert_eq!(classify(&path), Some(Action::Navigate("inicio".into())));
        let path = vec![node(Some(SEARCH_TRIGGER_ID), None), node(Some(TOGGLE_ID), None)];
        assert_eq!(classify(&path), Some(Action::ToggleSidebar));
    }

    #[test]
    fn unrelated_clicks_do_nothing() {
        assert_eq!(classify(&[]), None);
        assert_eq!(classify(&[node(Some("outro"), None), node(None, None)]), None);
    }
}
