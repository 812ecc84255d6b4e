use kokkai_core::{HttpTransport, Query, QueryClient, QueryError, QueryResult, Transport};
use tracing::{debug, error, info};

use crate::catalogue::{self, Meeting, Session};
use crate::handoff::{HandoffStoreRef, SearchCriteria};

/// A search that has been started but whose result is not applied yet.
///
/// Running it needs only the client, so it can outlive the borrow of the
/// screen that issued it.
#[derive(Debug)]
pub struct PendingSearch {
    ticket: u64,
    query: Query,
}

impl PendingSearch {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub async fn run<X: Transport>(self, client: &QueryClient<X>) -> SearchOutcome {
        let result = catalogue::search_meetings(client, &self.query).await;
        SearchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a [`PendingSearch`], tagged with the ticket that issued it
#[derive(Debug)]
pub struct SearchOutcome {
    ticket: u64,
    result: QueryResult<Vec<Meeting>>,
}

/// Meeting search screen
///
/// Holds the user's selection and what has been loaded for it. Query
/// failures are logged and recorded in `last_error`; loaded data is left as
/// it was.
#[derive(Debug)]
pub struct SearchScreen<X: Transport = HttpTransport> {
    client: QueryClient<X>,
    handoff: HandoffStoreRef,
    selection: SearchCriteria,
    include_unsummarized: bool,
    sessions: Vec<Session>,
    meeting_names: Vec<String>,
    meetings: Vec<Meeting>,
    loading: bool,
    last_error: Option<String>,
    latest_ticket: u64,
}

impl<X: Transport> SearchScreen<X> {
    pub fn new(client: QueryClient<X>, handoff: HandoffStoreRef) -> Self {
        Self {
            client,
            handoff,
            selection: SearchCriteria::default(),
            include_unsummarized: false,
            sessions: Vec::new(),
            meeting_names: Vec::new(),
            meetings: Vec::new(),
            loading: false,
            last_error: None,
            latest_ticket: 0,
        }
    }

    pub fn selection(&self) -> &SearchCriteria {
        &self.selection
    }

    pub fn include_unsummarized(&self) -> bool {
        self.include_unsummarized
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn meeting_names(&self) -> &[String] {
        &self.meeting_names
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn client(&self) -> &QueryClient<X> {
        &self.client
    }

    /// Called once when the screen is entered.
    ///
    /// Loads the session list, then takes any search handed over by the
    /// previous screen, adopts it as the selection and runs it straight
    /// away. Returns whether a handed-over search was run; criteria
    /// without a session are adopted but not searched.
    pub async fn mount(&mut self) -> bool {
        let pending = self.handoff.consume();
        self.load_sessions().await;

        let Some(criteria) = pending else {
            return false;
        };
        info!(
            session = ?criteria.session,
            meeting_name = ?criteria.meeting_name,
            houses = ?criteria.houses,
            "Replaying handed-over search"
        );
        self.adopt(criteria).await;
        self.search().await
    }

    async fn adopt(&mut self, criteria: SearchCriteria) {
        if let Some(session) = criteria.session {
            self.select_session(session).await;
            self.selection.meeting_name = criteria.meeting_name;
        }
        self.selection.houses = criteria.houses;
    }

    pub async fn load_sessions(&mut self) {
        match catalogue::fetch_sessions(&self.client).await {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => self.record_failure("Error fetching sessions", e),
        }
    }

    /// Choose a session and load its meeting names. Switching to a different
    /// session drops the chosen meeting name.
    pub async fn select_session(&mut self, session: i32) {
        if self.selection.session != Some(session) {
            self.selection.meeting_name = None;
        }
        self.selection.session = Some(session);

        match catalogue::fetch_meeting_names(&self.client, session).await {
            Ok(names) => self.meeting_names = names,
            Err(e) => self.record_failure("Error fetching meeting names", e),
        }
    }

    pub fn select_meeting_name(&mut self, meeting_name: Option<String>) {
        self.selection.meeting_name = meeting_name;
    }

    pub fn toggle_house(&mut self, house: &str) {
        if !self.selection.houses.remove(house) {
            self.selection.houses.insert(house.to_string());
        }
    }

    pub fn set_include_unsummarized(&mut self, include: bool) {
        self.include_unsummarized = include;
    }

    /// Whether the search action is available to the user
    pub fn can_search(&self) -> bool {
        !self.loading && self.selection.session.is_some() && self.selection.meeting_name.is_some()
    }

    /// Start a search for the current selection. `None` when no session is
    /// chosen. Any search started earlier becomes stale.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        let query = catalogue::search_meetings_query(&self.selection, self.include_unsummarized)?;
        self.latest_ticket += 1;
        self.loading = true;
        Some(PendingSearch {
            ticket: self.latest_ticket,
            query,
        })
    }

    /// Apply a finished search if it is still the latest one. Returns
    /// whether it was applied.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.ticket != self.latest_ticket {
            debug!(
                ticket = outcome.ticket,
                latest = self.latest_ticket,
                "Discarding stale search result"
            );
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok(meetings) => {
                debug!(count = meetings.len(), "Search returned meetings");
                self.meetings = meetings;
                self.last_error = None;
            }
            Err(e) => self.record_failure("Error searching meetings", e),
        }
        true
    }

    /// Search with the current selection and apply the result
    pub async fn search(&mut self) -> bool {
        let Some(pending) = self.begin_search() else {
            return false;
        };
        let outcome = pending.run(&self.client).await;
        self.apply(outcome)
    }

    /// Leave the screen. Searches still in flight will be discarded.
    pub fn leave(&mut self) {
        self.latest_ticket += 1;
        self.loading = false;
    }

    fn record_failure(&mut self, context: &str, error: QueryError) {
        error!(error = %error, "{}", context);
        self.last_error = Some(format!("{}: {}", context, error));
    }
}
