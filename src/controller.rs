//! Cascading Select Controller
//!
//! Keeps the sub-category field's options consistent with the main
//! category field. Each refresh clears the dependent field down to its
//! placeholder, fetches the list for the current main category and
//! repopulates it in the order received.
//!
//! Overlapping refreshes are allowed; each one takes a generation token
//! and only the most recently issued refresh may touch the field once its
//! response arrives.

use std::cell::{Cell, RefCell};

use log::{debug, error, info, warn};

use crate::api::{FetchJson, SubCategoryApi};
use crate::config::{FallbackPolicy, FilterConfig};
use crate::dom::{FormRoot, SelectField};
use crate::error::FilterError;
use crate::models::{SelectionState, SubCategory};

/// Which request produced the applied list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Scoped,
    Unscoped,
    /// Unscoped retry after the scoped request failed
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Populated {
        source: Source,
        count: usize,
        reselected: bool,
    },
    /// Every attempt failed; only the placeholder is left
    Failed,
    /// A newer refresh was issued while this one was in flight
    Stale,
}

pub struct CascadingSelect<F, C> {
    main: F,
    sub: F,
    api: SubCategoryApi<C>,
    fallback: FallbackPolicy,
    placeholder: String,
    generation: Cell<u64>,
    /// Selection to restore, carried across overlapping refreshes
    pending_selection: RefCell<Option<String>>,
}

impl<F: SelectField, C: FetchJson> CascadingSelect<F, C> {
    pub fn new(main: F, sub: F, client: C, config: &FilterConfig) -> Self {
        Self {
            main,
            sub,
            api: SubCategoryApi::new(client, config),
            fallback: config.fallback,
            placeholder: config.placeholder_label.clone(),
            generation: Cell::new(0),
            pending_selection: RefCell::new(None),
        }
    }

    /// Look up both fields under `root`. A form without them is not an
    /// error, it just has nothing to sync.
    pub fn attach<R>(root: &R, client: C, config: &FilterConfig) -> Option<Self>
    where
        R: FormRoot<Field = F>,
    {
        let Some(main) = root.select_field(&config.main_field_id) else {
            debug!("#{} not found, nothing to attach", config.main_field_id);
            return None;
        };
        let Some(sub) = root.select_field(&config.sub_field_id) else {
            debug!("#{} not found, nothing to attach", config.sub_field_id);
            return None;
        };
        Some(Self::new(main, sub, client, config))
    }

    pub fn main_field(&self) -> &F {
        &self.main
    }

    pub fn selection(&self) -> SelectionState {
        SelectionState {
            main_category: self.main.current_value(),
            sub_category: self.sub.current_value(),
        }
    }

    /// Refresh from the main field's current value
    pub async fn sync(&self) -> RefreshOutcome {
        let main_category = self.main.current_value();
        self.refresh(&main_category).await
    }

    pub async fn refresh(&self, main_category_id: &str) -> RefreshOutcome {
        let state = SelectionState {
            main_category: main_category_id.to_string(),
            sub_category: self.sub.current_value(),
        };
        let token = self.generation.get() + 1;
        self.generation.set(token);

        if let Err(err) = self.sub.reset_to_placeholder(&self.placeholder) {
            error!("could not clear sub-categories: {}", err);
            self.pending_selection.borrow_mut().take();
            return RefreshOutcome::Failed;
        }

        let previous = match state.previous_sub() {
            Some(value) => Some(value.to_string()),
            None => self.pending_selection.borrow().clone(),
        };
        *self.pending_selection.borrow_mut() = previous.clone();

        let fetched = self.fetch(state.scope()).await;

        if self.generation.get() != token {
            warn!(
                "discarding stale sub-categories for main category {:?}",
                state.scope().unwrap_or("")
            );
            return RefreshOutcome::Stale;
        }
        self.pending_selection.borrow_mut().take();

        match fetched {
            Some((source, options)) => self.populate(source, &options, previous.as_deref()),
            None => RefreshOutcome::Failed,
        }
    }

    async fn fetch(&self, scope: Option<&str>) -> Option<(Source, Vec<SubCategory>)> {
        let source = if scope.is_some() { Source::Scoped } else { Source::Unscoped };
        let err = match self.api.list(scope).await {
            Ok(options) => return Some((source, options)),
            Err(err) => err,
        };

        match scope {
            Some(id) => error!("error fetching sub-categories for main category {}: {}", id, err),
            None => error!("error fetching all sub-categories: {}", err),
        }
        if let FilterError::Decode(_) = err {
            return Some((source, Vec::new()));
        }
        if scope.is_none() || !err.is_transport() || self.fallback == FallbackPolicy::Strict {
            return None;
        }

        warn!("falling back to the unscoped sub-category list");
        match self.api.list(None).await {
            Ok(options) => Some((Source::Fallback, options)),
            Err(FilterError::Decode(msg)) => {
                error!("malformed fallback payload: {}", msg);
                Some((Source::Fallback, Vec::new()))
            }
            Err(err) => {
                error!("error fetching all sub-categories: {}", err);
                None
            }
        }
    }

    fn populate(&self, source: Source, options: &[SubCategory], previous: Option<&str>) -> RefreshOutcome {
        for option in options {
            if let Err(err) = self.sub.append_option(&option.option_value(), &option.name) {
                error!("could not add sub-category {}: {}", option.id, err);
                self.sub.reset_to_placeholder(&self.placeholder).ok();
                return RefreshOutcome::Failed;
            }
        }

        let reselected = previous.map(|value| self.sub.select_value(value)).unwrap_or(false);
        if !reselected {
            self.sub.select_placeholder();
        }

        info!("loaded {} sub-categories ({:?})", options.len(), source);
        RefreshOutcome::Populated {
            source,
            count: options.len(),
            reselected,
        }
    }
}
