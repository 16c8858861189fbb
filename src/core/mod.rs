pub mod app;
pub mod controller;
pub mod events;
pub mod render;

pub use crate::domain::model::{SearchCriteria, SearchOutcome, TherapistRecord};
pub use crate::domain::ports::{ConfigProvider, DirectoryClient, ResultsView};
pub use crate::utils::error::Result;
