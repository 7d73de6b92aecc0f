// crates/zonium-core/src/session.rs

//! Search-box glue: keystrokes in, latest result set out.
//!
//! [`ZoneSearch`] wires a [`TimeZoneIndex`] into a [`LatestWinsStream`] and
//! publishes what a dropdown needs to render through a `watch` channel.
//! Rendering itself is up to the caller.

use crate::error::ZoneError;
use crate::index::TimeZoneIndex;
use crate::stream::{CancelMode, LatestWinsStream};
use crate::text::is_meaningful;
use crate::traits::DataProvider;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// What the dropdown should show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchState {
    /// Display names of the matching zones, in dataset order.
    pub results: Vec<String>,
    pub popup_shown: bool,
    /// Message of the failed search, if the latest one failed.
    pub error: Option<String>,
}

impl SearchState {
    pub fn status_line(&self) -> &'static str {
        if self.results.is_empty() {
            "No matching Timezones"
        } else {
            "Add a Timezone"
        }
    }
}

pub struct ZoneSearch<P: DataProvider + 'static> {
    index: Arc<TimeZoneIndex<P>>,
    stream: LatestWinsStream<String, Vec<String>, ZoneError>,
    state: Arc<watch::Sender<SearchState>>,
}

impl<P: DataProvider + 'static> ZoneSearch<P> {
    /// Creates a session on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(index: Arc<TimeZoneIndex<P>>) -> Self {
        Self::with_cancel_mode(index, CancelMode::default())
    }

    pub fn with_cancel_mode(index: Arc<TimeZoneIndex<P>>, cancel_mode: CancelMode) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        let state = Arc::new(state);

        let mapper_index = Arc::clone(&index);
        let sink = Arc::clone(&state);
        let stream = LatestWinsStream::new(
            move |text: String| {
                let index = Arc::clone(&mapper_index);
                async move { index.search_names(text.as_str()).await }
            },
            move |outcome: Result<Vec<String>, ZoneError>| {
                sink.send_modify(|s| {
                    match outcome {
                        Ok(results) => {
                            s.results = results;
                            s.error = None;
                        }
                        Err(e) => {
                            warn!(error = %e, "time-zone search failed");
                            s.results.clear();
                            s.error = Some(e.to_string());
                        }
                    }
                    s.popup_shown = true;
                });
            },
        )
        .with_cancel_mode(cancel_mode);

        Self {
            index,
            stream,
            state,
        }
    }

    /// Feeds the current contents of the search box.
    ///
    /// Blank text cancels the pending search and hides the popup right away;
    /// anything else starts a new search superseding the previous one.
    pub fn update(&self, text: &str) {
        if is_meaningful(Some(text)) {
            self.stream.submit(text.to_owned());
        } else {
            self.stream.abort();
            self.state.send_modify(|s| {
                s.results.clear();
                s.error = None;
                s.popup_shown = false;
            });
        }
    }

    /// Picks a zone from the dropdown and clears the search box.
    pub fn select(&self, zone: &str) -> String {
        self.update("");
        zone.to_owned()
    }

    /// Hides the popup without touching the query (a click elsewhere).
    pub fn dismiss(&self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.popup_shown, false));
    }

    /// Receives every published [`SearchState`].
    ///
    /// Results are published from inside the stream's delivery lock. Drop any
    /// `watch::Ref` from `borrow()` before calling [`update`](Self::update) or
    /// [`select`](Self::select): holding it can deadlock against a delivery
    /// that is waiting to publish.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn status_line(&self) -> &'static str {
        self.state.borrow().status_line()
    }

    pub fn index(&self) -> &Arc<TimeZoneIndex<P>> {
        &self.index
    }

    pub fn stream(&self) -> &LatestWinsStream<String, Vec<String>, ZoneError> {
        &self.stream
    }
}

impl<P: DataProvider + 'static> std::fmt::Debug for ZoneSearch<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneSearch")
            .field("index", &self.index)
            .field("stream", &self.stream)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
