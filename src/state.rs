use std::collections::BTreeMap;

use crate::types::{MarkerPosition, Slot};

pub const MSG_EMPTY_TERM: &str = "Introduce unha matrícula ou ID.";
pub const MSG_SEARCHING: &str = "Buscando...";
pub const MSG_NOT_FOUND: &str = "Non se atopou ningún vehículo.";
pub const MSG_SEARCH_ERROR: &str = "Erro na busca.";
pub const NOTE_NO_TAG: &str = " Sen tag asignado.";
pub const NOTE_TAG_ERROR: &str = " Erro ao consultar o tag.";
pub const NOTE_NO_POSITION: &str = " Posición non dispoñible.";

pub fn located_message(reference: &str) -> String {
    format!("Vehículo \"{reference}\" localizado.")
}

/// Identifies one request among overlapping requests of the same kind.
pub type Ticket = u64;

/// Hands out increasing tickets; only the newest one is current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequencer {
    latest: Ticket,
}

impl Sequencer {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.latest
    }
}

/// One step of a vehicle lookup, as reported by the locator.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    NotFound,
    Located { reference: String },
    NoTag,
    Positioned(MarkerPosition),
    SearchFailed,
    TagFailed,
    PositionFailed,
}

/// The navigation link the user last clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLink {
    /// View token the link designates.
    pub view: String,
    /// Position of the clicked element among the document's `[data-view]`
    /// elements at click time, when it could be determined.
    pub ordinal: Option<usize>,
}

/// Everything the page shows, independent of the DOM. The reconcile step
/// in `utils::dom` writes it back to the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_link: Option<ActiveLink>,
    pub sidebar_collapsed: bool,
    pub result_text: Option<String>,
    pub marker: Option<MarkerPosition>,
    pub bindings: BTreeMap<Slot, String>,
    searches: Sequencer,
    view_loads: Sequencer,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the clicked link as active and returns the ticket its
    /// main-content load must present when it completes.
    ///
    /// # Parameters
    /// - `view`: validated view token
    /// - `ordinal`: index of the clicked element among `[data-view]` elements
    pub fn navigate(&mut self, view: &str, ordinal: Option<usize>) -> Ticket {
        self.active_link = Some(ActiveLink {
            view: view.to_string(),
            ordinal,
        });
        self.view_loads.issue()
    }

    /// Ticket for a main-content load that does not change the active link.
    pub fn begin_view_load(&mut self) -> Ticket {
        self.view_loads.issue()
    }

    pub fn is_current_view_load(&self, ticket: Ticket) -> bool {
        self.view_loads.is_current(ticket)
    }

    /// Records which fragment now fills `slot`.
    pub fn bind(&mut self, slot: Slot, fragment: &str) {
        self.bindings.insert(slot, fragment.to_string());
    }

    pub fn bound(&self, slot: Slot) -> Option<&str> {
        self.bindings.get(&slot).map(String::as_str)
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }

    /// Starts a search for the raw input value. Returns `None` (and shows
    /// the prompt) when the trimmed term is empty.
    ///
    /// A ticket is issued either way, so a search still in flight can no
    /// longer overwrite the prompt.
    pub fn begin_search(&mut self, raw_term: &str) -> Option<(Ticket, String)> {
        let term = raw_term.trim();
        let ticket = self.searches.issue();
        if term.is_empty() {
            self.result_text = Some(MSG_EMPTY_TERM.to_string());
            return None;
        }
        self.result_text = Some(MSG_SEARCHING.to_string());
        Some((ticket, term.to_string()))
    }

    /// Applies a locator update. Updates from superseded searches are
    /// dropped; the return value tells whether this one was applied.
    pub fn apply_search(&mut self, ticket: Ticket, update: SearchUpdate) -> bool {
        if !self.searches.is_current(ticket) {
            return false;
        }
        match update {
            SearchUpdate::NotFound => self.result_text = Some(MSG_NOT_FOUND.to_string()),
            SearchUpdate::Located { reference } => {
                self.result_text = Some(located_message(&reference))
            }
            SearchUpdate::NoTag => self.append_note(NOTE_NO_TAG),
            SearchUpdate::Positioned(pos) => self.marker = Some(pos),
            SearchUpdate::SearchFailed => self.result_text = Some(MSG_SEARCH_ERROR.to_string()),
            SearchUpdate::TagFailed => self.append_note(NOTE_TAG_ERROR),
            SearchUpdate::PositionFailed => self.append_note(NOTE_NO_POSITION),
        }
        true
    }

    fn append_note(&mut self, note: &str) {
        self.result_text.get_or_insert_with(String::new).push_str(note);
    }
}
