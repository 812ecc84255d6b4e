use std::sync::Arc;

use kokkai_core::{ClientSettings, ConfigError, HttpTransport, QueryClient, Transport};

use crate::handoff::{HandoffStoreRef, InMemoryHandoffStore};
use crate::screens::{SearchScreen, SummaryScreen};

/// Application state shared by all screens for the lifetime of the process
#[derive(Debug)]
pub struct AppContext<X: Transport = HttpTransport> {
    client: QueryClient<X>,
    handoff: HandoffStoreRef,
}

impl<X: Transport> Clone for AppContext<X> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            handoff: Arc::clone(&self.handoff),
        }
    }
}

impl AppContext<HttpTransport> {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(QueryClient::new(settings)?))
    }
}

impl<X: Transport> AppContext<X> {
    /// Context with a fresh, empty handoff store
    pub fn new(client: QueryClient<X>) -> Self {
        Self::with_store(client, Arc::new(InMemoryHandoffStore::new()))
    }

    pub fn with_store(client: QueryClient<X>, handoff: HandoffStoreRef) -> Self {
        Self { client, handoff }
    }

    pub fn client(&self) -> &QueryClient<X> {
        &self.client
    }

    pub fn handoff(&self) -> &HandoffStoreRef {
        &self.handoff
    }

    pub fn search_screen(&self) -> SearchScreen<X> {
        SearchScreen::new(self.client.clone(), Arc::clone(&self.handoff))
    }

    pub fn summary_screen(&self, issue_id: impl Into<String>) -> SummaryScreen<X> {
        SummaryScreen::new(self.client.clone(), Arc::clone(&self.handoff), issue_id)
    }
}
