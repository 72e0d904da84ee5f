//! Writes `ViewState` back into the document. Every lookup that finds
//! nothing is a no-op: the fragments that hold these elements may not be
//! loaded yet.
//!
//! What to change is decided by the pure `plan_*` / `sidebar_classes`
//! functions; the `sync_*` functions only apply their answers.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::state::{ActiveLink, ViewState};
use crate::types::MarkerPosition;

pub const SIDEBAR_ID: &str = "sidebar";
pub const RESULT_ID: &str = "resultadoBusqueda";
pub const FLOOR_PLAN_ID: &str = "plano-taller";
pub const MARKER_ID: &str = "marcador-vehiculo";
pub const VIEW_LINK_SELECTOR: &str = "[data-view]";

const COLLAPSED_CLASS: &str = "collapsed";
const HIDDEN_CLASS: &str = "d-none";
const ACTIVE_CLASS: &str = "active";
const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn set_inner_html(id: &str, html: &str) -> Option<()> {
    document()?.get_element_by_id(id)?.set_inner_html(html);
    Some(())
}

pub fn input_value(id: &str) -> Option<String> {
    document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.value())
}

/// Brings the document in line with `state`.
///
/// Called after every state change, including fragment injections, so a
/// freshly loaded sidebar or view picks up the collapse state, the active
/// link, the last result text and the marker.
///
/// # Parameters
/// - `state`: the current page state; nothing in it is modified
pub fn reconcile(state: &ViewState) {
    let Some(doc) = document() else {
        return;
    };
    sync_sidebar(&doc, state.sidebar_collapsed);
    if let Some(active) = state.active_link.as_ref() {
        sync_active_link(&doc, active);
    }
    if let Some(text) = state.result_text.as_deref() {
        sync_result(&doc, text);
    }
    if let Some(marker) = state.marker {
        sync_marker(&doc, marker);
    }
}

/// Position of the `[data-view]` element enclosing `target` among all
/// `[data-view]` elements of the document.
pub fn view_link_ordinal(target: &Element) -> Option<usize> {
    let doc = document()?;
    let link = target.closest(VIEW_LINK_SELECTOR).ok().flatten()?;
    let link_node: &web_sys::Node = &link;
    query_all(&doc, VIEW_LINK_SELECTOR)
        .iter()
        .position(|el| el.is_same_node(Some(link_node)))
}

fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn set_class(el: &Element, class: &str, on: bool) {
    let classes = el.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        log::debug!("[dom] clase {class} en #{}: {e:?}", el.id());
    }
}

/// Class flags for the sidebar and its two logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarClasses {
    pub collapsed: bool,
    pub expand_logo_hidden: bool,
    pub collapse_logo_hidden: bool,
}

/// Collapsed shows only the compact logo; expanded shows only the full one.
pub fn sidebar_classes(collapsed: bool) -> SidebarClasses {
    SidebarClasses {
        collapsed,
        expand_logo_hidden: collapsed,
        collapse_logo_hidden: !collapsed,
    }
}

fn sync_sidebar(doc: &Document, collapsed: bool) {
    let Some(sidebar) = doc.get_element_by_id(SIDEBAR_ID) else {
        return;
    };
    let classes = sidebar_classes(collapsed);
    set_class(&sidebar, COLLAPSED_CLASS, classes.collapsed);
    // Either logo may be missing from the fragment.
    if let Ok(Some(logo)) = sidebar.query_selector(".logo-expand") {
        set_class(&logo, HIDDEN_CLASS, classes.expand_logo_hidden);
    }
    if let Ok(Some(logo)) = sidebar.query_selector(".logo-collapse") {
        set_class(&logo, HIDDEN_CLASS, classes.collapse_logo_hidden);
    }
}

/// A `[data-view]` element as seen by `plan_active_link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub view: String,
    pub in_sidebar: bool,
}

/// Index of the one link that should carry `active`.
///
/// The clicked element wins while it is still at its recorded position
/// and still designates the same view. Otherwise (its fragment was
/// replaced, or the ordinal was unknown) the first sidebar link for the
/// view is used, then the first link anywhere. Attribute values are
/// compared trimmed, the same way view tokens are parsed.
pub fn plan_active_link(links: &[LinkCandidate], active: &ActiveLink) -> Option<usize> {
    let designates = |link: &LinkCandidate| link.view.trim() == active.view;
    active
        .ordinal
        .filter(|&i| links.get(i).is_some_and(|link| designates(link)))
        .or_else(|| {
            links
                .iter()
                .position(|link| link.in_sidebar && designates(link))
        })
        .or_else(|| links.iter().position(|link| designates(link)))
}

fn sync_active_link(doc: &Document, active: &ActiveLink) {
    // Sidebar entries without `data-view` still lose the marker.
    for link in query_all(doc, &format!("#{SIDEBAR_ID} .nav-link")) {
        set_class(&link, ACTIVE_CLASS, false);
    }
    let links = query_all(doc, VIEW_LINK_SELECTOR);
    let candidates: Vec<LinkCandidate> = links
        .iter()
        .map(|el| LinkCandidate {
            view: el.get_attribute("data-view").unwrap_or_default(),
            in_sidebar: el
                .closest(&format!("#{SIDEBAR_ID}"))
                .ok()
                .flatten()
                .is_some(),
        })
        .collect();
    let chosen = plan_active_link(&candidates, active);
    for (i, link) in links.iter().enumerate() {
        set_class(link, ACTIVE_CLASS, Some(i) == chosen);
    }
}

fn sync_result(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id(RESULT_ID) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

pub fn format_coord(value: f64) -> String {
    format!("{value}")
}

/// What to do with the floor-plan marker for a target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPlan {
    /// A marker already sits at the position.
    Keep,
    /// A marker exists elsewhere: remove it, then draw a new one.
    Replace,
    /// No marker yet.
    Create,
}

/// `existing` holds the `cx`/`cy` attributes of the current marker, if any.
pub fn plan_marker(existing: Option<(Option<&str>, Option<&str>)>, pos: MarkerPosition) -> MarkerPlan {
    match existing {
        None => MarkerPlan::Create,
        Some((cx, cy))
            if cx == Some(format_coord(pos.x).as_str())
                && cy == Some(format_coord(pos.y).as_str()) =>
        {
            MarkerPlan::Keep
        }
        Some(_) => MarkerPlan::Replace,
    }
}

fn sync_marker(doc: &Document, pos: MarkerPosition) {
    let Some(svg) = doc.get_element_by_id(FLOOR_PLAN_ID) else {
        return;
    };
    let existing = svg.query_selector(&format!("#{MARKER_ID}")).ok().flatten();
    let attrs = existing
        .as_ref()
        .map(|el| (el.get_attribute("cx"), el.get_attribute("cy")));
    let plan = plan_marker(
        attrs.as_ref().map(|(cx, cy)| (cx.as_deref(), cy.as_deref())),
        pos,
    );
    match plan {
        MarkerPlan::Keep => return,
        MarkerPlan::Replace => {
            if let Some(old) = existing {
                old.remove();
            }
        }
        MarkerPlan::Create => {}
    }
    if let Err(e) = draw_marker(doc, &svg, pos) {
        log::warn!("[plano] non se puido debuxar o marcador: {e:?}");
    }
}

fn draw_marker(
    doc: &Document,
    svg: &Element,
    pos: MarkerPosition,
) -> Result<(), wasm_bindgen::JsValue> {
    let circle = doc.create_element_ns(Some(SVG_NS), "circle")?;
    circle.set_attribute("cx", &format_coord(pos.x))?;
    circle.set_attribute("cy", &format_coord(pos.y))?;
    circle.set_attribute("r", "10")?;
    circle.set_attribute("fill", "#ff8500")?;
    circle.set_attribute("stroke", "#000")?;
    circle.set_attribute("stroke-width", "1")?;
    circle.set_attribute("id", MARKER_ID)?;
    svg.append_child(&circle)?;
    Ok(())
}
