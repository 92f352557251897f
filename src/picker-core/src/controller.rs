//! The picker state machine.
//!
//! [`PickerController`] owns the query, the displayed results, the picks and
//! the keyboard cursors. It is driven by discrete events (key events, clicks,
//! focus changes, task completions) and never blocks: anything that has to
//! wait is returned as a [`PickerTask`] for the caller to await.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde_json::Value;
use tokio::sync::watch;

use crate::config::{PickerConfig, ResultsPath, SourceConfig};
use crate::error::{PickerError, PickerResult};
use crate::item::Item;
use crate::key::{KeyCode, KeyEvent, KeyPhase};
use crate::navigation::Navigation;
use crate::picks::PickSet;
use crate::source::{ChoiceResponse, ChoiceSource, Fetcher, HttpFetcher, LocalSource, RemoteSource};
use crate::task::{BLUR_DELAY, Completion, FOCUS_DELAY, PickerTask, TaskKind};

/// Placeholder shown when the picker is misconfigured.
pub const ERROR_PLACEHOLDER: &str = "ERROR";

/// Called with the full pick list after every pick mutation.
pub type ChangeCallback = Box<dyn FnMut(&[Item]) + Send>;

/// Called when the query field should take focus.
pub type FocusCallback = Box<dyn FnMut() + Send>;

/// Result of handling a key event.
#[derive(Debug, Default)]
pub struct KeyOutcome {
    /// The default action of the key (form submission) must be suppressed.
    pub prevent_default: bool,
    /// A search started by the key.
    pub task: Option<PickerTask>,
}

/// Builder for [`PickerController`].
pub struct PickerBuilder {
    config: PickerConfig,
    source: Option<Arc<dyn ChoiceSource>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    on_change: Option<ChangeCallback>,
    on_focus: Option<FocusCallback>,
}

impl PickerBuilder {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            source: None,
            fetcher: None,
            on_change: None,
            on_focus: None,
        }
    }

    /// Uses a custom choice source instead of the one described by the config.
    pub fn source(mut self, source: Arc<dyn ChoiceSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Transport for a remote source. Defaults to [`HttpFetcher`].
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(&[Item]) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_focus(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_focus = Some(Box::new(callback));
        self
    }

    /// Builds the controller and seeds the initial picks.
    ///
    /// A config without a model binding yields a disabled controller: it
    /// shows [`ERROR_PLACEHOLDER`], ignores keys and refuses to activate.
    pub fn build(self) -> PickerController {
        let config = self.config;

        let results_path = match &config.source {
            SourceConfig::Remote(remote) => remote.results_path.clone(),
            SourceConfig::Local(_) => ResultsPath::default(),
        };

        let source: Arc<dyn ChoiceSource> = match self.source {
            Some(source) => source,
            None => match &config.source {
                SourceConfig::Local(_) => {
                    Arc::new(LocalSource::new(config.candidates(), &config.display_field))
                }
                SourceConfig::Remote(remote) => {
                    let fetcher: Arc<dyn Fetcher> = match self.fetcher {
                        Some(fetcher) => fetcher,
                        None => Arc::new(HttpFetcher::new()),
                    };
                    Arc::new(RemoteSource::from_config(remote, fetcher))
                }
            },
        };

        let config_error = match config.model.as_deref() {
            Some(model) if !model.trim().is_empty() => None,
            _ => {
                tracing::error!("The picker requires a model binding");
                Some(PickerError::MissingModel)
            }
        };

        let (selections_tx, _) = watch::channel(Vec::new());
        let seeds = config.seed_picks();

        let mut controller = PickerController {
            name: config.name,
            placeholder: config.placeholder,
            display_field: config.display_field,
            results_path,
            source,
            query: String::new(),
            choices: Vec::new(),
            picks: PickSet::new(config.value_field, config.multiple),
            nav: Navigation::new(),
            busy: false,
            show_results: false,
            active: false,
            search_seq: 0,
            blur_token: 0,
            config_error,
            on_change: self.on_change,
            on_focus: self.on_focus,
            selections_tx,
        };

        if controller.is_enabled() {
            for item in seeds {
                controller.add_pick(item);
            }
        }

        controller
    }
}

/// Search-and-pick state machine.
pub struct PickerController {
    name: String,
    placeholder: String,
    display_field: String,
    results_path: ResultsPath,
    source: Arc<dyn ChoiceSource>,

    query: String,
    choices: Vec<Item>,
    picks: PickSet,
    nav: Navigation,

    busy: bool,
    show_results: bool,
    active: bool,

    /// Sequence number of the most recently issued search.
    search_seq: u64,
    /// Token of the most recent blur; bumped again on activation.
    blur_token: u64,

    config_error: Option<PickerError>,
    on_change: Option<ChangeCallback>,
    on_focus: Option<FocusCallback>,
    selections_tx: watch::Sender<Vec<String>>,
}

impl PickerController {
    pub fn builder(config: PickerConfig) -> PickerBuilder {
        PickerBuilder::new(config)
    }

    pub fn new(config: PickerConfig) -> Self {
        PickerBuilder::new(config).build()
    }

    // ---- state ----

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the query text. Called by the view as the field is edited.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn choices(&self) -> &[Item] {
        &self.choices
    }

    pub fn picks(&self) -> &[Item] {
        self.picks.items()
    }

    /// Value keys of the picks, in pick order. This is the bound model value.
    pub fn selections(&self) -> Vec<String> {
        self.picks.selections()
    }

    /// Watches the selections; a new value is published on every pick change.
    pub fn subscribe_selections(&self) -> watch::Receiver<Vec<String>> {
        self.selections_tx.subscribe()
    }

    pub fn selected(&self) -> usize {
        self.nav.selected()
    }

    pub fn selected_choice(&self) -> Option<&Item> {
        self.choices.get(self.nav.selected())
    }

    pub fn highlight(&self) -> isize {
        self.nav.highlight()
    }

    pub fn highlighted_pick(&self) -> Option<&Item> {
        self.nav
            .highlighted_pick(self.picks.len())
            .and_then(|i| self.picks.items().get(i))
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_showing_results(&self) -> bool {
        self.show_results
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_multiple(&self) -> bool {
        self.picks.is_multiple()
    }

    pub fn is_enabled(&self) -> bool {
        self.config_error.is_none()
    }

    pub fn config_error(&self) -> Option<&PickerError> {
        self.config_error.as_ref()
    }

    /// Form field name for the selections.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placeholder(&self) -> &str {
        if self.is_enabled() {
            &self.placeholder
        } else {
            ERROR_PLACEHOLDER
        }
    }

    /// Display text of an item.
    pub fn label(&self, item: &Item) -> String {
        item.text(&self.display_field).unwrap_or_default()
    }

    // ---- navigation ----

    pub fn scroll_choices(&mut self, delta: isize) {
        self.nav.scroll_choices(delta, self.choices.len());
    }

    pub fn scroll_highlight(&mut self, direction: isize) {
        self.nav.scroll_highlight(direction, self.picks.len());
    }

    /// Moves the result cursor to `index`, e.g. on hover.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        self.nav.scroll_to(index, self.choices.len())
    }

    // ---- picks ----

    /// Adds a pick and notifies listeners.
    ///
    /// In single-pick mode the pick replaces any previous one and the picker
    /// deactivates. Returns `false` if the item was already picked.
    pub fn add_pick(&mut self, item: Item) -> bool {
        if !self.picks.add(item) {
            tracing::debug!("Ignoring pick already present");
            return false;
        }
        if !self.picks.is_multiple() {
            self.active = false;
        }
        self.nav.unhighlight(self.picks.len());
        self.notify_change();
        true
    }

    /// Removes the pick at `index`, or the highlighted pick when `None`.
    pub fn remove_pick(&mut self, index: Option<usize>) -> Option<Item> {
        let index = match index {
            Some(index) => index,
            None => usize::try_from(self.nav.highlight()).ok()?,
        };
        let removed = self.picks.remove(index)?;
        self.nav.unhighlight(self.picks.len());
        self.notify_change();
        Some(removed)
    }

    /// Picks the result under the cursor. No-op without results.
    pub fn pick_highlighted(&mut self) -> bool {
        let Some(chosen) = self.selected_choice().cloned() else {
            return false;
        };
        self.hide_results();
        self.query.clear();
        self.add_pick(chosen)
    }

    /// Picks the result at `index`, e.g. on click.
    ///
    /// A click follows the blur of the query field; it is honored only while
    /// the results are still shown, i.e. within [`BLUR_DELAY`] of the blur.
    pub fn pick_at(&mut self, index: usize) -> bool {
        self.scroll_to(index) && self.pick_highlighted()
    }

    /// Hides and discards the displayed results. A search still in flight
    /// is superseded and its response dropped.
    pub fn hide_results(&mut self) {
        if self.busy {
            self.search_seq += 1;
            self.busy = false;
        }
        self.show_results = false;
        self.choices.clear();
        self.nav.reset_selected();
    }

    // ---- events ----

    /// Starts a search for the current query.
    pub fn search(&mut self) -> PickerResult<PickerTask> {
        if let Some(err) = &self.config_error {
            return Err(PickerError::Disabled(err.to_string()));
        }
        Ok(self.start_search())
    }

    fn start_search(&mut self) -> PickerTask {
        self.search_seq += 1;
        self.busy = true;
        tracing::debug!(seq = self.search_seq, query = %self.query, "Searching");
        PickerTask::search(self.search_seq, Arc::clone(&self.source), self.query.clone())
    }

    /// Interprets a key event from the query field.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        if !self.is_enabled() {
            return outcome;
        }

        if event.phase == KeyPhase::Press {
            if event.code == KeyCode::Enter && !self.choices.is_empty() {
                outcome.prevent_default = true;
                self.pick_highlighted();
            }
            return outcome;
        }

        match event.code {
            KeyCode::Up => self.scroll_choices(-1),
            KeyCode::Down => self.scroll_choices(1),
            code if code.is_alphanumeric() => outcome.task = Some(self.start_search()),
            KeyCode::Delete | KeyCode::Backspace if !self.query.is_empty() => {
                outcome.task = Some(self.start_search());
            }
            KeyCode::Delete => {
                self.hide_results();
                self.remove_pick(None);
            }
            KeyCode::Backspace => {
                self.hide_results();
                self.remove_pick(None);
                self.scroll_highlight(-1);
            }
            code @ (KeyCode::Left | KeyCode::Right) if event.caret_at_start => {
                if let Some(direction) = code.horizontal_direction() {
                    self.scroll_highlight(direction);
                }
            }
            _ => {}
        }
        outcome
    }

    /// Activates the picker and schedules focusing the query field.
    pub fn activate_and_focus(&mut self) -> PickerResult<PickerTask> {
        if let Some(err) = &self.config_error {
            return Err(PickerError::Disabled(err.to_string()));
        }
        self.active = true;
        // Any blur still pending belongs to the previous activation.
        self.blur_token += 1;
        Ok(PickerTask::delayed(
            TaskKind::Focus,
            FOCUS_DELAY,
            Completion::Focus,
        ))
    }

    /// Schedules closing the picker after the query field loses focus.
    pub fn handle_blur(&mut self) -> PickerTask {
        self.blur_token += 1;
        PickerTask::delayed(
            TaskKind::Blur,
            BLUR_DELAY,
            Completion::Blur {
                token: self.blur_token,
            },
        )
    }

    /// Applies a finished task.
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Search { seq, result } => {
                if seq != self.search_seq {
                    tracing::debug!(seq, latest = self.search_seq, "Dropping stale search response");
                    return;
                }
                self.busy = false;
                let items = result
                    .map_err(PickerError::from)
                    .and_then(|response| extract_items(response, &self.results_path));
                match items {
                    Ok(items) => self.show_choices(items),
                    Err(PickerError::Source(err)) => {
                        tracing::debug!(status = ?err.status(), "Search failed: {err}");
                    }
                    Err(err) => tracing::warn!("Unusable search response: {err}"),
                }
            }
            Completion::Focus => {
                if !self.active {
                    return;
                }
                if let Some(focus) = self.on_focus.as_mut() {
                    focus();
                }
            }
            Completion::Blur { token } => {
                if token != self.blur_token {
                    tracing::debug!(token, "Ignoring superseded blur");
                    return;
                }
                self.active = false;
                self.hide_results();
            }
        }
    }

    /// Awaits the given tasks and applies each completion as it arrives.
    pub async fn settle(&mut self, tasks: impl IntoIterator<Item = PickerTask>) {
        let mut pending: FuturesUnordered<_> = tasks
            .into_iter()
            .map(std::future::IntoFuture::into_future)
            .collect();
        while let Some(completion) = pending.next().await {
            self.complete(completion);
        }
    }

    fn show_choices(&mut self, mut items: Vec<Item>) {
        self.picks.retain_unpicked(&mut items);
        self.choices = items;
        self.nav.reset_selected();
        self.show_results = true;
    }

    fn notify_change(&mut self) {
        self.selections_tx.send_replace(self.picks.selections());
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.picks.items());
        }
    }
}

impl std::fmt::Debug for PickerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerController")
            .field("query", &self.query)
            .field("choices", &self.choices.len())
            .field("picks", &self.picks.len())
            .field("selected", &self.nav.selected())
            .field("highlight", &self.nav.highlight())
            .field("busy", &self.busy)
            .field("show_results", &self.show_results)
            .field("active", &self.active)
            .field("config_error", &self.config_error)
            .finish_non_exhaustive()
    }
}

/// Walks the results path into a response and collects the items there.
/// Entries that are not objects are skipped.
fn extract_items(response: ChoiceResponse, path: &ResultsPath) -> PickerResult<Vec<Item>> {
    let mut value = match response {
        ChoiceResponse::Items(items) => return Ok(items),
        ChoiceResponse::Raw(value) => value,
    };

    for segment in path.segments() {
        let next = match value {
            Value::Object(mut map) => map.remove(segment),
            Value::Array(mut values) => segment
                .parse::<usize>()
                .ok()
                .filter(|&i| i < values.len())
                .map(|i| values.swap_remove(i)),
            _ => None,
        };
        value = next.ok_or_else(|| PickerError::path_not_found(segment))?;
    }

    match value {
        Value::Array(values) => Ok(values.into_iter().filter_map(Item::from_value).collect()),
        other => Err(PickerError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
