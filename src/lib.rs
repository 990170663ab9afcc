//! Category Filter
//!
//! Keeps the admin product form's sub-category select in sync with the
//! chosen main category. Loaded by the admin page and started with
//! `initialize(root?)` or `initializeWithConfig({...}, root?)`, where
//! `root` is the document or form element holding both fields.

pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod models;

#[cfg(test)]
mod testing;

use std::rc::Rc;
use std::sync::OnceLock;

use gloo_timers::future::TimeoutFuture;
use log::{debug, error};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;

pub use api::{FetchJson, GlooFetch, SubCategoryApi};
pub use config::{Endpoint, FallbackPolicy, FilterConfig};
pub use controller::{CascadingSelect, RefreshOutcome, Source};
pub use debounce::Debouncer;
pub use dom::HostRoot;
pub use error::FilterError;
pub use models::{OptionId, SelectionState, SubCategory, SubCategoryPayload};

type Controller = CascadingSelect<HtmlSelectElement, GlooFetch>;

static HOOKS_INSTALLED: OnceLock<()> = OnceLock::new();

/// Start with the default field ids and endpoint. `root` may be a
/// `Document` or an `Element`; omitted means the window's document.
#[wasm_bindgen]
pub fn initialize(root: JsValue) -> Result<(), JsValue> {
    start(FilterConfig::default(), root)
}

#[wasm_bindgen(js_name = initializeWithConfig)]
pub fn initialize_with_config(config: JsValue, root: JsValue) -> Result<(), JsValue> {
    let config = FilterConfig::from_js(config)?;
    start(config, root)
}

fn start(config: FilterConfig, root: JsValue) -> Result<(), JsValue> {
    install_hooks(&config)?;

    let Some(root) = HostRoot::from_js(root) else {
        debug!("no document, category filter not started");
        return Ok(());
    };
    let Some(document) = root.document() else {
        debug!("root is detached, category filter not started");
        return Ok(());
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || bind(&root, config));
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        return Ok(());
    }

    bind(&root, config);
    Ok(())
}

fn install_hooks(config: &FilterConfig) -> Result<(), FilterError> {
    let level = config.level_filter()?;
    HOOKS_INSTALLED.get_or_init(|| {
        console_error_panic_hook::set_once();
        // Fails only when the host page already installed a logger
        if console_logger::init(level).is_err() {
            debug!("keeping the existing logger");
        }
    });
    Ok(())
}

/// Wire the controller to the form under `root` and run the initial sync
fn bind(root: &HostRoot, config: FilterConfig) {
    let Some(controller) = CascadingSelect::attach(root, GlooFetch, &config) else {
        return;
    };
    let controller = Rc::new(controller);
    listen_for_changes(controller.clone(), Debouncer::new(config.debounce_ms));

    spawn_local(async move {
        controller.sync().await;
    });
}

fn listen_for_changes(controller: Rc<Controller>, debouncer: Debouncer) {
    let target = controller.main_field().clone();
    let debouncer = Rc::new(debouncer);

    let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
        let controller = controller.clone();
        let debouncer = debouncer.clone();
        let ticket = debouncer.register();

        spawn_local(async move {
            debounce::sync_after_quiet(&controller, &debouncer, ticket, TimeoutFuture::new).await;
        });
    });

    if let Err(err) = target.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref()) {
        error!("could not listen for main category changes: {:?}", err);
    }
    on_change.forget();
}
