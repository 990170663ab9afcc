//! In-memory stand-ins for the DOM and the HTTP client

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use crate::api::FetchJson;
use crate::dom::{FormRoot, SelectField};
use crate::error::FilterError;

type Reply = Result<Value, FilterError>;

#[derive(Default)]
struct ClientState {
    replies: HashMap<String, Reply>,
    held: HashMap<String, oneshot::Receiver<Reply>>,
    requests: Vec<String>,
}

/// Canned responses keyed by URL; unknown URLs fail with 404
#[derive(Clone, Default)]
pub struct FakeClient {
    state: Rc<RefCell<ClientState>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, reply: Reply) {
        self.state.borrow_mut().replies.insert(url.to_string(), reply);
    }

    /// The next request to `url` waits until the returned sender fires
    pub fn hold(&self, url: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().held.insert(url.to_string(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }
}

#[async_trait(?Send)]
impl FetchJson for FakeClient {
    async fn fetch_json(&self, url: &str) -> Result<Value, FilterError> {
        let held = {
            let mut state = self.state.borrow_mut();
            state.requests.push(url.to_string());
            state.held.remove(url)
        };
        if let Some(rx) = held {
            return rx
                .await
                .unwrap_or_else(|_| Err(FilterError::Network("sender dropped".into())));
        }
        self.state
            .borrow()
            .replies
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FilterError::Status { status: 404, url: url.to_string() }))
    }
}

#[derive(Default)]
struct SelectState {
    /// (value, label)
    options: Vec<(String, String)>,
    selected: usize,
    fail_reset: bool,
}

#[derive(Clone, Default)]
pub struct FakeSelect {
    state: Rc<RefCell<SelectState>>,
}

impl FakeSelect {
    pub fn with_options(options: &[(&str, &str)], selected: usize) -> Self {
        let select = Self::default();
        {
            let mut state = select.state.borrow_mut();
            state.options = options
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect();
            state.selected = selected;
        }
        select
    }

    pub fn values(&self) -> Vec<String> {
        self.state.borrow().options.iter().map(|(v, _)| v.clone()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.state.borrow().options.iter().map(|(_, l)| l.clone()).collect()
    }

    pub fn fail_next_reset(&self) {
        self.state.borrow_mut().fail_reset = true;
    }

    pub fn set_value(&self, value: &str) {
        assert!(self.select_value(value), "no option with value {value:?}");
    }
}

impl SelectField for FakeSelect {
    fn current_value(&self) -> String {
        let state = self.state.borrow();
        state
            .options
            .get(state.selected)
            .map(|(v, _)| v.clone())
            .unwrap_or_default()
    }

    fn reset_to_placeholder(&self, label: &str) -> Result<(), FilterError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_reset) {
            return Err(FilterError::Dom("detached".into()));
        }
        let keep = state.options.first().map(|(v, _)| v.is_empty()).unwrap_or(false);
        if keep {
            state.options.truncate(1);
        } else {
            state.options = vec![(String::new(), label.to_string())];
        }
        state.selected = 0;
        Ok(())
    }

    fn append_option(&self, value: &str, label: &str) -> Result<(), FilterError> {
        self.state
            .borrow_mut()
            .options
            .push((value.to_string(), label.to_string()));
        Ok(())
    }

    fn select_value(&self, value: &str) -> bool {
        let mut state = self.state.borrow_mut();
        match state.options.iter().position(|(v, _)| v == value) {
            Some(index) => {
                state.selected = index;
                true
            }
            None => false,
        }
    }

    fn select_placeholder(&self) {
        self.state.borrow_mut().selected = 0;
    }
}

#[derive(Default)]
pub struct FakeDocument {
    fields: HashMap<String, FakeSelect>,
}

impl FakeDocument {
    pub fn with_field(mut self, id: &str, field: FakeSelect) -> Self {
        self.fields.insert(id.to_string(), field);
        self
    }
}

impl FormRoot for FakeDocument {
    type Field = FakeSelect;

    fn select_field(&self, id: &str) -> Option<FakeSelect> {
        self.fields.get(id).cloned()
    }
}
