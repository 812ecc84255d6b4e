use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

/// A user's filter selection on the search screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Diet session number. Criteria without a session cannot be searched.
    pub session: Option<i32>,
    /// Optional committee / plenary name
    pub meeting_name: Option<String>,
    /// Selected houses; empty means no restriction
    pub houses: BTreeSet<String>,
}

impl SearchCriteria {
    pub fn new(session: i32) -> Self {
        Self {
            session: Some(session),
            ..Default::default()
        }
    }

    pub fn with_meeting_name(mut self, meeting_name: impl Into<String>) -> Self {
        self.meeting_name = Some(meeting_name.into());
        self
    }

    pub fn with_house(mut self, house: impl Into<String>) -> Self {
        self.houses.insert(house.into());
        self
    }

    /// Whether a search can be run from these criteria
    pub fn is_searchable(&self) -> bool {
        self.session.is_some()
    }

    /// The house to filter on. Only a single selected house narrows the
    /// search; none or both means every house.
    pub fn house_filter(&self) -> Option<&str> {
        if self.houses.len() == 1 {
            self.houses.iter().next().map(String::as_str)
        } else {
            None
        }
    }
}

/// Single-slot store for a pending search
///
/// `publish` and `consume` are each one atomic step: no caller can observe a
/// slot that is half written or read without being cleared.
pub trait HandoffStore: Send + Sync + Debug {
    /// Replace whatever is pending with `criteria`
    fn publish(&self, criteria: SearchCriteria);

    /// Take the pending criteria, leaving the slot empty
    fn consume(&self) -> Option<SearchCriteria>;

    /// Look at the pending criteria without clearing them
    fn peek(&self) -> Option<SearchCriteria>;

    fn is_pending(&self) -> bool {
        self.peek().is_some()
    }
}

/// Type alias for Arc-wrapped HandoffStore trait objects
pub type HandoffStoreRef = Arc<dyn HandoffStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_builder() {
        let criteria = SearchCriteria::new(217)
            .with_meeting_name("内閣委員会")
            .with_house("衆議院");

        assert_eq!(criteria.session, Some(217));
        assert_eq!(criteria.meeting_name.as_deref(), Some("内閣委員会"));
        assert!(criteria.houses.contains("衆議院"));
        assert!(criteria.is_searchable());
    }

    #[test]
    fn test_criteria_without_session_is_not_searchable() {
        let criteria = SearchCriteria::default().with_meeting_name("本会議");
        assert!(!criteria.is_searchable());
    }

    #[test]
    fn test_house_filter() {
        let none = SearchCriteria::new(217);
        assert_eq!(none.house_filter(), None);

        let one = SearchCriteria::new(217).with_house("参議院");
        assert_eq!(one.house_filter(), Some("参議院"));

        let both = SearchCriteria::new(217)
            .with_house("衆議院")
            .with_house("参議院");
        assert_eq!(both.house_filter(), None);

        // Houses form a set
        let repeated = SearchCriteria::new(217)
            .with_house("衆議院")
            .with_house("衆議院");
        assert_eq!(repeated.house_filter(), Some("衆議院"));
    }
}
