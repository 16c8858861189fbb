pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    http::HttpDirectoryClient,
    view::{HtmlFileView, WriterView},
};
pub use config::{AppConfig, TomlConfig};
pub use crate::core::{
    app::{ElisApp, EventResult},
    controller::{AutoSearchWhenCriteriaPresent, ManualOnly, SearchController, SubmitStatus, TriggerPolicy},
    events::{Key, KeyPress, Shortcut, UiEvent},
    render::ResultRenderer,
};
pub use domain::model::{FilterField, FormState, SearchCriteria, SearchOutcome, TherapistRecord};
pub use domain::ports::{ConfigProvider, DirectoryClient, ResultsView};
pub use utils::error::{Result, SearchError};
