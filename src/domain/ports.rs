use crate::domain::model::{SearchCriteria, TherapistRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn therapists_path(&self) -> &str;
}

/// Remote therapist directory lookup.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<TherapistRecord>>;
}

/// Where rendered results end up.
pub trait ResultsView: Send {
    fn show(&mut self, html: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn scroll_to_results(&mut self) {}
    fn set_loading(&mut self, _loading: bool) {}
}
