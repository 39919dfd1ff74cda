//! Browser binding: DOM form fields, overlay containers and page callbacks.

use std::cell::RefCell;
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, MouseEvent};

use crate::config::AppConfig;
use crate::error::OverlayError;
use crate::fields::{self, FieldFocus, FieldSink, FieldSource};
use crate::model::TextBox;
use crate::overlay::{Overlay, OverlayTarget};
use crate::palette::ColorPicker;
use crate::placement::{self, BoxPlacer, Placement};
use crate::render::{PanelRenderer, RenderContext};

/// Per-page state kept between callbacks.
struct PageState {
    config: AppConfig,
    renderer: PanelRenderer,
    panels: HashMap<usize, TextBox>,
    overlays: HashMap<usize, Overlay>,
    placers: HashMap<usize, BoxPlacer>,
    picker: ColorPicker,
}

impl PageState {
    fn new(config: AppConfig) -> Self {
        Self {
            renderer: PanelRenderer::from_config(&config),
            config,
            panels: HashMap::new(),
            overlays: HashMap::new(),
            placers: HashMap::new(),
            picker: ColorPicker::new(),
        }
    }

    fn refresh(&mut self, doc: &Document, panel: usize) -> Result<bool, OverlayError> {
        let rect = *self
            .panels
            .get(&panel)
            .ok_or(OverlayError::UnknownPanel { index: panel })?;
        let dom = DomFields::new(doc.clone());
        let data = fields::read_panel(
            &dom,
            panel,
            rect,
            self.config.max_slots,
            &self.config.langs,
        );

        let focus = doc
            .active_element()
            .and_then(|el| FieldFocus::parse(&el.id(), &self.config.langs));
        let ctx = RenderContext::from_config(&self.config).with_focus(focus);
        let html = self.renderer.render_panel(&data, &ctx)?;

        let id = fields::overlay_container_id(panel);
        let mut target = ElementTarget(
            doc.get_element_by_id(&id)
                .ok_or_else(|| OverlayError::missing_element(id))?,
        );
        self.overlays
            .entry(panel)
            .or_default()
            .refresh(&mut target, html)
    }
}

thread_local! {
    static STATE: RefCell<Option<PageState>> = const { RefCell::new(None) };
}

fn with_state<R>(f: impl FnOnce(&mut PageState) -> R) -> R {
    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let state = state.get_or_insert_with(|| PageState::new(AppConfig::default()));
        f(state)
    })
}

fn document() -> Result<Document, OverlayError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| OverlayError::Browser("No document available".to_string()))
}

fn browser_error(e: JsValue) -> OverlayError {
    let message = match e.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{:?}", e),
    };
    OverlayError::Browser(message)
}

/// Log an error and show it to the user.
fn report(context: &str, e: &OverlayError) {
    log::error!("{}: {}", context, e);
    if let Some(window) = web_sys::window() {
        if let Err(alert) = window.alert_with_message(&format!("{}: {}", context, e)) {
            log::debug!("Alert not shown: {:?}", alert);
        }
    }
}

/// Form fields looked up by id in the live document.
struct DomFields {
    doc: Document,
}

impl DomFields {
    fn new(doc: Document) -> Self {
        Self { doc }
    }
}

impl FieldSource for DomFields {
    fn field_value(&self, id: &str) -> Option<String> {
        let el = self.doc.get_element_by_id(id)?;
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(input.value()),
            Err(el) => el.dyn_into::<HtmlTextAreaElement>().ok().map(|t| t.value()),
        }
    }
}

impl FieldSink for DomFields {
    fn set_field_value(&mut self, id: &str, value: &str) -> Result<(), OverlayError> {
        let el = self
            .doc
            .get_element_by_id(id)
            .ok_or_else(|| OverlayError::missing_element(id))?;
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => input.set_value(value),
            Err(el) => el
                .dyn_into::<HtmlTextAreaElement>()
                .map_err(|_| OverlayError::missing_element(id))?
                .set_value(value),
        }
        Ok(())
    }
}

/// Overlay container element.
struct ElementTarget(Element);

impl OverlayTarget for ElementTarget {
    fn set_markup(&mut self, markup: &str) -> Result<(), OverlayError> {
        self.0.set_inner_html(markup);
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load_from_local_storage().unwrap_or_default();
    if console_log::init_with_level(config.preferences.log_level.to_level()).is_err() {
        web_sys::console::log_1(&"Logger already initialized".into());
    }
    log::info!("Scanlet overlay binding started, languages {:?}", config.langs);

    STATE.with(|cell| *cell.borrow_mut() = Some(PageState::new(config)));
}

/// Re-render the overlay of one panel from its form fields.
///
/// The panel bounds are remembered for later refreshes and clicks.
#[wasm_bindgen]
pub fn refresh_panel_rects(panel: usize, x: i32, y: i32, width: i32, height: i32) {
    let result = document().and_then(|doc| {
        with_state(|state| {
            state
                .panels
                .insert(panel, TextBox::new(x, y, width, height));
            state.refresh(&doc, panel)
        })
    });
    if let Err(e) = result {
        report(&format!("Panel {} refresh failed", panel), &e);
    }
}

/// Switch the shown language and re-render every known panel.
#[wasm_bindgen]
pub fn refresh_all_panel_rects(lang_index: usize) {
    let result = document().and_then(|doc| {
        with_state(|state| {
            if lang_index < state.config.langs.len() {
                state.config.primary_lang = lang_index;
            } else {
                log::warn!("Language index {} out of range", lang_index);
            }
            let mut panels: Vec<usize> = state.panels.keys().copied().collect();
            panels.sort_unstable();
            let mut written = 0;
            for panel in panels {
                if state.refresh(&doc, panel)? {
                    written += 1;
                }
            }
            log::debug!("Refreshed all panels, {} changed", written);
            Ok(())
        })
    });
    if let Err(e) = result {
        report("Panel refresh failed", &e);
    }
}

/// Auxiliary click into a panel view: place a box corner, or with Shift
/// held set the bubble pointer. Returns whether the click was used.
#[wasm_bindgen]
pub fn on_panel_aux_click(event: MouseEvent, panel: usize, zoom_div: f64) -> bool {
    let result = document().and_then(|doc| {
        with_state(|state| {
            let rect = *state
                .panels
                .get(&panel)
                .ok_or(OverlayError::UnknownPanel { index: panel })?;
            let at = placement::click_to_page(
                rect.top_left(),
                f64::from(event.offset_x()),
                f64::from(event.offset_y()),
                zoom_div,
            );

            let max_slots = state.config.max_slots;
            let placer = state
                .placers
                .entry(panel)
                .or_insert_with(|| BoxPlacer::new(panel, max_slots));
            let mut dom = DomFields::new(doc.clone());
            let placed = if event.shift_key() {
                placer.point(&mut dom, at)?
            } else {
                placer.click(&mut dom, at)?
            };

            if placed != Placement::NoSlot {
                state.refresh(&doc, panel)?;
            }
            Ok(placed)
        })
    });

    match result {
        Ok(Placement::NoSlot) => false,
        Ok(placed) => {
            log::debug!("Panel {}: {:?}", panel, placed);
            event.prevent_default();
            true
        }
        Err(e) => {
            report(&format!("Panel {} click failed", panel), &e);
            false
        }
    }
}

/// Drop a half-placed box of `panel`, e.g. when Escape is pressed.
/// Returns whether a corner was pending.
#[wasm_bindgen]
pub fn cancel_panel_placement(panel: usize) -> bool {
    with_state(|state| match state.placers.get_mut(&panel) {
        Some(placer) => {
            let pending = placer.pending().is_some();
            placer.cancel();
            if pending {
                log::debug!("Panel {}: placement cancelled", panel);
            }
            pending
        }
        None => false,
    })
}

/// Record the triggering control and submit the main form.
#[wasm_bindgen]
pub fn do_post_back(name: &str) {
    let result = document().and_then(|doc| {
        fields::prepare_post_back(&mut DomFields::new(doc.clone()), name)?;
        doc.get_element_by_id(fields::FORM_ID)
            .ok_or_else(|| OverlayError::missing_element(fields::FORM_ID))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| OverlayError::missing_element(fields::FORM_ID))?
            .submit()
            .map_err(browser_error)
    });
    if let Err(e) = result {
        report("Post-back failed", &e);
    }
}

/// Pick a colorization colour by key; returns its hex value.
#[wasm_bindgen]
pub fn pick_color(label: &str) -> Result<String, JsValue> {
    with_state(|state| state.picker.select_label(label))
        .map(|color| color.to_hex())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Swatch grid of the colour picker, current colour marked.
#[wasm_bindgen]
pub fn color_palette_html() -> Result<String, JsValue> {
    with_state(|state| state.picker.to_html()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Persist the current settings for the next page load.
#[wasm_bindgen]
pub fn save_config() -> Result<(), JsValue> {
    with_state(|state| state.config.save_to_local_storage())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
