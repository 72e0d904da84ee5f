use leptos::prelude::*;

use crate::types::Slot;

/// Empty page frame; its containers are filled with fetched fragments.
#[component]
pub fn Shell() -> impl IntoView {
    view! {
        <div class="d-flex">
            <div id={Slot::Sidebar.container_id()}></div>
            <div class="d-flex flex-column flex-grow-1 min-vh-100">
                <div id={Slot::Header.container_id()}></div>
                <main id={Slot::Main.container_id()} class="flex-grow-1 p-3"></main>
                <div id={Slot::Footer.container_id()}></div>
            </div>
        </div>
    }
}
