//! Configuration types for the picker.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PickerError, PickerResult};
use crate::item::Item;

/// Default placeholder text shown in the query field.
pub const DEFAULT_PLACEHOLDER: &str = "Select";

/// Default name of the field displayed for each item.
pub const DEFAULT_DISPLAY_FIELD: &str = "name";

/// Default name of the field used as the item value.
pub const DEFAULT_VALUE_FIELD: &str = "id";

/// Default query parameter for remote searches.
pub const DEFAULT_SEARCH_KEY: &str = "q";

/// Initialization inputs for a picker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Name of the external model the selections are bound to. Required.
    pub model: Option<String>,

    /// Form field name used when the selections are submitted.
    pub name: String,

    /// Placeholder text for the query field.
    pub placeholder: String,

    /// Field of each item shown to the user.
    pub display_field: String,

    /// Field of each item used as its identifying value.
    pub value_field: String,

    /// Whether more than one pick may be held at a time.
    pub multiple: bool,

    /// Where candidates come from.
    pub source: SourceConfig,

    /// Items picked before the user interacts with the control.
    pub initial_picks: Vec<Item>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            model: None,
            name: String::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            display_field: DEFAULT_DISPLAY_FIELD.to_string(),
            value_field: DEFAULT_VALUE_FIELD.to_string(),
            multiple: false,
            source: SourceConfig::default(),
            initial_picks: Vec::new(),
        }
    }
}

/// Candidate source selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    /// Filter a static list in memory.
    Local(LocalConfig),
    /// Fetch candidates from a remote endpoint.
    Remote(RemoteConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Local(LocalConfig::default())
    }
}

/// Static candidate list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Candidates given as complete items.
    pub choices: Vec<Item>,

    /// Candidates given as label/value options, like a `<select>` widget.
    pub options: Vec<SelectOption>,
}

/// One label/value option. Selected options seed the initial picks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
    #[serde(default)]
    pub selected: bool,
}

impl SelectOption {
    /// Creates an unselected option.
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected: false,
        }
    }

    /// Marks the option as pre-selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// URL searched on every query.
    pub url: String,

    /// Query parameter carrying the search text.
    #[serde(default = "default_search_key")]
    pub search_key: String,

    /// Where the results array lives in the response.
    #[serde(default, alias = "results_in")]
    pub results_path: ResultsPath,

    /// Parameters sent with every search.
    #[serde(default)]
    pub extra_params: BTreeMap<String, Value>,
}

fn default_search_key() -> String {
    DEFAULT_SEARCH_KEY.to_string()
}

impl RemoteConfig {
    /// Creates a remote config for the given URL with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            search_key: default_search_key(),
            results_path: ResultsPath::default(),
            extra_params: BTreeMap::new(),
        }
    }

    /// Sets the query parameter name.
    pub fn search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = key.into();
        self
    }

    /// Sets the dotted results path, e.g. `"results.matches"`.
    pub fn results_path(mut self, path: &str) -> Self {
        self.results_path = ResultsPath::parse(path);
        self
    }

    /// Adds a parameter sent with every search.
    pub fn extra_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_params.insert(name.into(), value.into());
        self
    }
}

/// Path from a raw response to the array of results.
///
/// An empty path means the response is the array itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct ResultsPath(Vec<String>);

impl ResultsPath {
    /// Splits a dotted path into segments. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ResultsPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&str> for ResultsPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl PickerConfig {
    /// Creates a builder for constructing a configuration.
    pub fn builder() -> PickerConfigBuilder {
        PickerConfigBuilder::new()
    }

    /// Loads a configuration file. `.toml` files are TOML, anything else JSON.
    pub fn load(path: impl AsRef<Path>) -> PickerResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PickerError::read_config(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> PickerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> PickerResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Returns the static candidates, built with the configured fields.
    /// Remote sources have none.
    pub fn candidates(&self) -> Vec<Item> {
        match &self.source {
            SourceConfig::Local(local) => local
                .choices
                .iter()
                .cloned()
                .chain(local.options.iter().map(|opt| self.option_item(opt)))
                .collect(),
            SourceConfig::Remote(_) => Vec::new(),
        }
    }

    /// Returns the items to pick on initialization: selected options first,
    /// then the explicit initial picks.
    pub fn seed_picks(&self) -> Vec<Item> {
        let selected: Vec<Item> = match &self.source {
            SourceConfig::Local(local) => local
                .options
                .iter()
                .filter(|opt| opt.selected)
                .map(|opt| self.option_item(opt))
                .collect(),
            SourceConfig::Remote(_) => Vec::new(),
        };
        selected
            .into_iter()
            .chain(self.initial_picks.iter().cloned())
            .collect()
    }

    fn option_item(&self, opt: &SelectOption) -> Item {
        Item::from_pair(
            &self.display_field,
            &self.value_field,
            opt.label.clone(),
            opt.value.clone(),
        )
    }
}

/// Builder for creating `PickerConfig` instances.
#[derive(Debug, Default)]
pub struct PickerConfigBuilder {
    config: PickerConfig,
    local: LocalConfig,
    remote: Option<RemoteConfig>,
}

impl PickerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the external model binding.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    /// Sets the form field name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    pub fn display_field(mut self, field: impl Into<String>) -> Self {
        self.config.display_field = field.into();
        self
    }

    pub fn value_field(mut self, field: impl Into<String>) -> Self {
        self.config.value_field = field.into();
        self
    }

    /// Enables multi-pick mode.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.config.multiple = multiple;
        self
    }

    /// Uses a static list of candidates.
    pub fn choices(mut self, choices: impl IntoIterator<Item = Item>) -> Self {
        self.local.choices.extend(choices);
        self
    }

    /// Adds a label/value option to the static candidates.
    pub fn option(mut self, option: SelectOption) -> Self {
        self.local.options.push(option);
        self
    }

    /// Uses a remote endpoint for candidates. Takes precedence over any
    /// static candidates.
    pub fn remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Adds an item picked on initialization.
    pub fn initial_pick(mut self, item: Item) -> Self {
        self.config.initial_picks.push(item);
        self
    }

    pub fn build(self) -> PickerConfig {
        let source = match self.remote {
            Some(remote) => SourceConfig::Remote(remote),
            None => SourceConfig::Local(self.local),
        };
        PickerConfig {
            source,
            ..self.config
        }
    }
}
