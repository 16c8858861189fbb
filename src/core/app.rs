use crate::adapters::http::HttpDirectoryClient;
use crate::config::AppConfig;
use crate::core::controller::{SearchController, SubmitStatus, TriggerPolicy};
use crate::core::events::{Shortcut, UiEvent};
use crate::domain::model::FormState;
use crate::domain::ports::{DirectoryClient, ResultsView};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Result of feeding one UI event to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    Search(SubmitStatus),
    Reset,
    Ignored,
    Quit,
}

/// Application context created once at startup and handed to whatever drives it.
pub struct ElisApp<D: DirectoryClient> {
    config: AppConfig,
    controller: SearchController<D>,
}

impl ElisApp<HttpDirectoryClient<AppConfig>> {
    pub fn new(config: AppConfig, view: Box<dyn ResultsView>) -> Result<Self> {
        config.validate()?;
        let client = HttpDirectoryClient::new(config.clone());
        tracing::info!("🚀 ELIS search initialized (API: {})", config.api_base_url);
        Ok(Self::with_client(config, client, view))
    }
}

impl<D: DirectoryClient> ElisApp<D> {
    pub fn with_client(config: AppConfig, client: D, view: Box<dyn ResultsView>) -> Self {
        Self {
            config,
            controller: SearchController::new(client, view),
        }
    }

    pub fn with_trigger_policy(mut self, policy: Box<dyn TriggerPolicy>) -> Self {
        self.controller = self.controller.with_trigger_policy(policy);
        self
    }

    pub fn with_form(mut self, form: FormState) -> Self {
        self.controller = self.controller.with_form(form);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn controller(&self) -> &SearchController<D> {
        &self.controller
    }

    pub async fn handle_event(&self, event: UiEvent) -> Result<EventResult> {
        match event {
            UiEvent::FilterChanged { field, value } => Ok(EventResult::Search(
                self.controller.on_filter_changed(field, value).await?,
            )),
            UiEvent::Submit => Ok(EventResult::Search(self.controller.submit_search().await?)),
            UiEvent::Key(press) => match Shortcut::from_key(press) {
                Some(Shortcut::Submit) => {
                    Ok(EventResult::Search(self.controller.submit_search().await?))
                }
                Some(Shortcut::Reset) => {
                    self.controller.reset()?;
                    Ok(EventResult::Reset)
                }
                None => Ok(EventResult::Ignored),
            },
            UiEvent::Quit => Ok(EventResult::Quit),
        }
    }
}
