//! DOM input overlay for cell editing.
//!
//! An `<input>` element placed over the edit session's rectangle. Key
//! handling stays with the host page, which forwards keys and text to the
//! grid.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::layout::CellRect;

pub(crate) struct InputOverlay {
    input: Option<HtmlInputElement>,
    container: Option<HtmlElement>,
}

impl InputOverlay {
    /// `container` is the positioned element the input is appended to
    /// (document body when `None`).
    pub(crate) fn new(container: Option<HtmlElement>) -> Self {
        Self {
            input: None,
            container,
        }
    }

    /// Show the overlay at `rect` (CSS pixels relative to the container).
    pub(crate) fn show(&mut self, rect: &CellRect, value: &str, font: &str, background: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = self.get_or_create_input(&document) else {
            return;
        };
        let style = input.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("font", font);
        let _ = style.set_property("background", background);
        input.set_value(value);
        Self::place(input, rect);
        let _ = input.focus();
        input.select();
    }

    /// Follow the session after a scroll or resize.
    pub(crate) fn reposition(&self, rect: &CellRect) {
        if let Some(input) = &self.input {
            Self::place(input, rect);
        }
    }

    pub(crate) fn hide(&self) {
        if let Some(input) = &self.input {
            let _ = input.style().set_property("display", "none");
            let _ = input.blur();
        }
    }

    pub(crate) fn value(&self) -> Option<String> {
        self.input.as_ref().map(HtmlInputElement::value)
    }

    fn place(input: &HtmlInputElement, rect: &CellRect) {
        let style = input.style();
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.width));
        let _ = style.set_property("height", &format!("{}px", rect.height));
    }

    fn get_or_create_input(&mut self, document: &Document) -> Option<&HtmlInputElement> {
        if self.input.is_none() {
            let input = document
                .create_element("input")
                .ok()?
                .dyn_into::<HtmlInputElement>()
                .ok()?;
            input.set_type("text");
            let style = input.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("z-index", "1000");
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("border", "2px solid #084B8A");
            let _ = style.set_property("outline", "none");
            let _ = style.set_property("padding", "0 2px");
            let _ = style.set_property("display", "none");

            if let Some(c) = &self.container {
                let _ = c.append_child(&input);
            } else if let Some(body) = document.body() {
                let _ = body.append_child(&input);
            }
            self.input = Some(input);
        }
        self.input.as_ref()
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        if let Some(input) = &self.input {
            if let Some(parent) = input.parent_node() {
                let _ = parent.remove_child(input);
            }
        }
    }
}
