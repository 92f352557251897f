#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc
)]
//! Picker Core - Search-and-pick controller for form fields.
//!
//! A picker lets the user type a query, browse the matching candidates and
//! pick one item (single mode) or several (multi mode). Candidates come from
//! a fixed local list or from a remote JSON endpoint.
//!
//! # Features
//!
//! - Case-insensitive substring search over local candidates
//! - Remote search over HTTP with a configurable results path
//! - Stale responses from superseded searches are dropped
//! - Keyboard navigation over the results and over the picks
//! - Change notification through a callback and a `watch` channel
//!
//! # Example
//!
//! ```no_run
//! use picker_core::{Item, KeyCode, KeyEvent, PickerConfig, PickerController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PickerConfig::builder()
//!         .model("person")
//!         .choices([
//!             Item::from_pair("name", "id", "Bob Gobbs", 4444),
//!             Item::from_pair("name", "id", "Bob Flobbs", 99994),
//!         ])
//!         .build();
//!     let mut picker = PickerController::new(config);
//!
//!     picker.set_query("gobb");
//!     let outcome = picker.handle_key(KeyEvent::release(KeyCode::Char('b')));
//!     picker.settle(outcome.task).await;
//!     picker.handle_key(KeyEvent::press(KeyCode::Enter));
//!
//!     println!("{:?}", picker.selections());
//! }
//! ```

mod config;
mod controller;
mod error;
mod item;
mod key;
mod navigation;
mod picks;
mod source;
mod task;

pub use config::{
    DEFAULT_DISPLAY_FIELD, DEFAULT_PLACEHOLDER, DEFAULT_SEARCH_KEY, DEFAULT_VALUE_FIELD,
    LocalConfig, PickerConfig, PickerConfigBuilder, RemoteConfig, ResultsPath, SelectOption,
    SourceConfig,
};
pub use controller::{
    ChangeCallback, ERROR_PLACEHOLDER, FocusCallback, KeyOutcome, PickerBuilder, PickerController,
};
pub use error::{PickerError, PickerResult, SourceError, SourceResult};
pub use item::Item;
pub use key::{KeyCode, KeyEvent, KeyPhase};
pub use navigation::Navigation;
pub use picks::PickSet;
pub use source::{ChoiceResponse, ChoiceSource, Fetcher, HttpFetcher, LocalSource, RemoteSource};
pub use task::{BLUR_DELAY, Completion, FOCUS_DELAY, PickerTask, TaskKind};

/// Re-export async_trait for implementing [`ChoiceSource`] and [`Fetcher`].
pub use async_trait::async_trait;
