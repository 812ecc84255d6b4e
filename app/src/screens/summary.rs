use kokkai_core::{HttpTransport, QueryClient, Transport};
use tracing::{error, info, warn};

use crate::catalogue::{self, MeetingDetail};
use crate::handoff::{HandoffStoreRef, SearchCriteria};

/// Per-meeting summary screen
#[derive(Debug)]
pub struct SummaryScreen<X: Transport = HttpTransport> {
    client: QueryClient<X>,
    handoff: HandoffStoreRef,
    issue_id: String,
    meeting: Option<MeetingDetail>,
    last_error: Option<String>,
}

impl<X: Transport> SummaryScreen<X> {
    pub fn new(client: QueryClient<X>, handoff: HandoffStoreRef, issue_id: impl Into<String>) -> Self {
        Self {
            client,
            handoff,
            issue_id: issue_id.into(),
            meeting: None,
            last_error: None,
        }
    }

    pub fn issue_id(&self) -> &str {
        &self.issue_id
    }

    pub fn meeting(&self) -> Option<&MeetingDetail> {
        self.meeting.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Load the meeting this screen shows
    pub async fn mount(&mut self) {
        match catalogue::fetch_meeting(&self.client, &self.issue_id).await {
            Ok(Some(meeting)) => {
                info!(issue_id = %self.issue_id, "Loaded meeting");
                self.meeting = Some(meeting);
                self.last_error = None;
            }
            Ok(None) => {
                warn!(issue_id = %self.issue_id, "Meeting not found");
                self.last_error = Some(format!("Meeting {} not found", self.issue_id));
            }
            Err(e) => {
                error!(issue_id = %self.issue_id, error = %e, "Error fetching meeting");
                self.last_error = Some(format!("Error fetching meeting: {}", e));
            }
        }
    }

    /// Hand this meeting's session, name and house to the search screen.
    ///
    /// Returns the published criteria, or `None` if no meeting is loaded.
    pub fn back_to_search(&self) -> Option<SearchCriteria> {
        let criteria = self.meeting.as_ref()?.meeting.criteria();
        self.handoff.publish(criteria.clone());
        Some(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::{HandoffStore, InMemoryHandoffStore};
    use crate::screens::test_support::FakeCatalogue;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mount_loads_meeting() {
        let fake = FakeCatalogue::default();
        let store = Arc::new(InMemoryHandoffStore::new());
        let mut screen = SummaryScreen::new(fake.client(), store, "121705254X00120250218");

        screen.mount().await;

        let meeting = screen.meeting().unwrap();
        assert_eq!(meeting.meeting.name_of_meeting.as_deref(), Some("内閣委員会"));
        let summary = meeting.summary.as_ref().unwrap();
        assert!(summary.summary.as_deref().unwrap().starts_with("## 決議された事項"));
        assert!(screen.last_error().is_none());
    }

    #[tokio::test]
    async fn test_unknown_meeting() {
        let fake = FakeCatalogue::default();
        let store = Arc::new(InMemoryHandoffStore::new());
        let mut screen = SummaryScreen::new(fake.client(), store.clone(), "nope");

        screen.mount().await;

        assert!(screen.meeting().is_none());
        assert_eq!(screen.last_error(), Some("Meeting nope not found"));
        assert_eq!(screen.back_to_search(), None);
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_back_to_search_publishes_criteria() {
        let fake = FakeCatalogue::default();
        let store = Arc::new(InMemoryHandoffStore::new());
        let mut screen = SummaryScreen::new(fake.client(), store.clone(), "121814184X00120250801");
        screen.mount().await;

        let published = screen.back_to_search().unwrap();

        assert_eq!(
            published,
            SearchCriteria::new(218)
                .with_meeting_name("議院運営委員会")
                .with_house("参議院")
        );
        assert_eq!(store.consume(), Some(published));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded() {
        let fake = FakeCatalogue::default();
        fake.set_unavailable(true);
        let store = Arc::new(InMemoryHandoffStore::new());
        let mut screen = SummaryScreen::new(fake.client(), store, "121705254X00120250218");

        screen.mount().await;

        assert!(screen.meeting().is_none());
        assert!(screen.last_error().unwrap().contains("503"));
    }
}
