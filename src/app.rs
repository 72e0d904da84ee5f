use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::components::click_handlers::{handle_click, load_layout, show_view};
use crate::components::shell::Shell;
use crate::config::AppConfig;
use crate::fragments::ViewToken;
use crate::state::ViewState;
use crate::utils::{dom, url};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_document();
    log::info!("[app] API en {}", config.api_base);

    let state = RwSignal::new(ViewState::new());

    // Re-render the DOM from state on every change, including fragment loads.
    Effect::new(move |_| {
        state.with(dom::reconcile);
    });

    Effect::new(move |_| {
        let config = config.clone();
        install_click_listener(state, config.clone());
        load_layout(state, &config);
        let initial = url::read_view_from_url()
            .filter(|view| ViewToken::parse(view).is_ok())
            .unwrap_or_else(|| config.default_view.clone());
        show_view(&initial, state, &config);
    });

    view! { <Shell/> }
}

fn install_click_listener(state: RwSignal<ViewState>, config: AppConfig) {
    let Some(document) = dom::document() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        handle_click(&event, state, &config);
    }) as Box<dyn FnMut(_)>);
    if let Err(e) =
        document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
    {
        log::error!("[app] non se puido rexistrar o clic: {e:?}");
    }
    closure.forget();
}
