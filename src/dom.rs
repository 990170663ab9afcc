//! DOM Access
//!
//! The two form fields the controller touches, behind small traits so the
//! sync logic runs against in-memory fields in tests.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlOptionElement, HtmlSelectElement};

use crate::error::FilterError;

/// A single-select form field
pub trait SelectField {
    fn current_value(&self) -> String;
    /// Drop every option except a leading empty-value one, inserting it
    /// with `label` when the field has none
    fn reset_to_placeholder(&self, label: &str) -> Result<(), FilterError>;
    fn append_option(&self, value: &str, label: &str) -> Result<(), FilterError>;
    /// Select the option carrying `value`; false when no option does
    fn select_value(&self, value: &str) -> bool;
    fn select_placeholder(&self);
}

/// Where the fields are looked up
pub trait FormRoot {
    type Field: SelectField;
    /// `None` when the id is missing or is not a `<select>`
    fn select_field(&self, id: &str) -> Option<Self::Field>;
}

/// Index of the first option whose value is `value`, as `selectedIndex`
/// takes it. `None` entries are non-option children and still count.
fn option_position<I>(values: I, value: &str) -> Option<i32>
where
    I: IntoIterator<Item = Option<String>>,
{
    let index = values
        .into_iter()
        .position(|candidate| candidate.as_deref() == Some(value))?;
    i32::try_from(index).ok()
}

/// Attribute selector matching an element id, quoted for CSS
fn id_selector(id: &str) -> String {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[id=\"{}\"]", escaped)
}

fn dom_error(err: JsValue) -> FilterError {
    FilterError::Dom(format!("{:?}", err))
}

impl SelectField for HtmlSelectElement {
    fn current_value(&self) -> String {
        self.value()
    }

    fn reset_to_placeholder(&self, label: &str) -> Result<(), FilterError> {
        let has_placeholder = self
            .options()
            .item(0)
            .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .map(|opt| opt.value().is_empty())
            .unwrap_or(false);

        if has_placeholder {
            self.set_length(1);
        } else {
            self.set_length(0);
            self.append_option("", label)?;
        }
        self.set_selected_index(0);
        Ok(())
    }

    fn append_option(&self, value: &str, label: &str) -> Result<(), FilterError> {
        let option = HtmlOptionElement::new_with_text_and_value(label, value).map_err(dom_error)?;
        self.add_with_html_option_element(&option).map_err(dom_error)
    }

    fn select_value(&self, value: &str) -> bool {
        let options = self.options();
        let values = (0..options.length()).map(|index| {
            options
                .item(index)
                .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
                .map(|opt| opt.value())
        });
        match option_position(values, value) {
            Some(index) => {
                self.set_selected_index(index);
                true
            }
            None => false,
        }
    }

    fn select_placeholder(&self) {
        self.set_selected_index(0);
    }
}

impl FormRoot for Document {
    type Field = HtmlSelectElement;

    fn select_field(&self, id: &str) -> Option<HtmlSelectElement> {
        self.get_element_by_id(id)?.dyn_into::<HtmlSelectElement>().ok()
    }
}

/// Scopes the lookup to one subtree, e.g. a single inline form
impl FormRoot for Element {
    type Field = HtmlSelectElement;

    fn select_field(&self, id: &str) -> Option<HtmlSelectElement> {
        self.query_selector(&id_selector(id))
            .ok()??
            .dyn_into::<HtmlSelectElement>()
            .ok()
    }
}

/// Root handed to `initialize` from JS
#[derive(Clone)]
pub enum HostRoot {
    Document(Document),
    Element(Element),
}

impl HostRoot {
    /// Accepts a `Document` or an `Element`; anything else (including
    /// `undefined`) falls back to the window's document
    pub fn from_js(value: JsValue) -> Option<Self> {
        if let Some(document) = value.dyn_ref::<Document>() {
            return Some(HostRoot::Document(document.clone()));
        }
        if let Some(element) = value.dyn_ref::<Element>() {
            return Some(HostRoot::Element(element.clone()));
        }
        web_sys::window()
            .and_then(|w| w.document())
            .map(HostRoot::Document)
    }

    pub fn document(&self) -> Option<Document> {
        match self {
            HostRoot::Document(document) => Some(document.clone()),
            HostRoot::Element(element) => element.owner_document(),
        }
    }
}

impl FormRoot for HostRoot {
    type Field = HtmlSelectElement;

    fn select_field(&self, id: &str) -> Option<HtmlSelectElement> {
        match self {
            HostRoot::Document(document) => document.select_field(id),
            HostRoot::Element(element) => element.select_field(id),
        }
    }
}
