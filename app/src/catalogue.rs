//! Operations against the meeting catalogue and the records they return.

use chrono::NaiveDate;
use kokkai_core::{Query, QueryClient, QueryResult, Transport};
use serde::Deserialize;

use crate::handoff::SearchCriteria;

pub const HOUSE_OF_REPRESENTATIVES: &str = "衆議院";
pub const HOUSE_OF_COUNCILLORS: &str = "参議院";
pub const HOUSES: [&str; 2] = [HOUSE_OF_REPRESENTATIVES, HOUSE_OF_COUNCILLORS];

pub const GET_SESSIONS_QUERY: &str = r#"
  query GetSessions {
    sessions {
      session
      name
    }
  }
"#;

pub const GET_MEETING_NAMES_QUERY: &str = r#"
  query GetMeetingNames($session: Int!) {
    meetingNames(session: $session)
  }
"#;

pub const SEARCH_MEETINGS_QUERY: &str = r#"
  query SearchMeetings(
    $session: Int!
    $nameOfHouse: String
    $nameOfMeeting: String
    $hasSummary: Boolean
  ) {
    meetings(
      session: $session
      nameOfHouse: $nameOfHouse
      nameOfMeeting: $nameOfMeeting
      hasSummary: $hasSummary
    ) {
      issueId
      session
      nameOfHouse
      nameOfMeeting
      issue
      date
    }
  }
"#;

pub const GET_MEETING_QUERY: &str = r#"
  query GetMeeting($issueId: String!) {
    meetings(issueId: $issueId) {
      issueId
      session
      nameOfHouse
      nameOfMeeting
      issue
      date
      meetingUrl
      pdfUrl
      summary {
        summary
        model
        createTime
        updateTime
      }
    }
  }
"#;

/// A Diet session (回次)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub session: i32,
    pub name: String,
}

/// One meeting record as listed in search results
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub issue_id: String,
    pub session: i32,
    pub name_of_house: String,
    #[serde(default)]
    pub name_of_meeting: Option<String>,
    pub issue: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Meeting {
    /// Criteria that would find this meeting again
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            session: Some(self.session),
            meeting_name: self.name_of_meeting.clone(),
            houses: [self.name_of_house.clone()].into_iter().collect(),
        }
    }
}

/// Generated summary of a meeting
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// A meeting with its links and summary, as shown on the summary screen
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub meeting_url: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

#[derive(Deserialize)]
struct SessionsData {
    sessions: Vec<Session>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingNamesData {
    meeting_names: Vec<String>,
}

#[derive(Deserialize)]
struct MeetingsData<T> {
    meetings: Vec<T>,
}

pub fn sessions_query() -> Query {
    Query::new(GET_SESSIONS_QUERY)
}

pub fn meeting_names_query(session: i32) -> Query {
    Query::new(GET_MEETING_NAMES_QUERY).with_variable("session", session)
}

/// Build the search for `criteria`, or `None` when no session is chosen.
///
/// Meetings without a summary are left out unless `include_unsummarized`.
pub fn search_meetings_query(criteria: &SearchCriteria, include_unsummarized: bool) -> Option<Query> {
    let session = criteria.session?;
    Some(
        Query::new(SEARCH_MEETINGS_QUERY)
            .with_variable("session", session)
            .with_variable("nameOfMeeting", criteria.meeting_name.clone())
            .with_variable("nameOfHouse", criteria.house_filter().map(str::to_string))
            .with_variable("hasSummary", !include_unsummarized),
    )
}

pub fn meeting_query(issue_id: &str) -> Query {
    Query::new(GET_MEETING_QUERY).with_variable("issueId", issue_id)
}

pub async fn fetch_sessions<X: Transport>(client: &QueryClient<X>) -> QueryResult<Vec<Session>> {
    let data: SessionsData = client.execute(&sessions_query()).await?;
    Ok(data.sessions)
}

pub async fn fetch_meeting_names<X: Transport>(
    client: &QueryClient<X>,
    session: i32,
) -> QueryResult<Vec<String>> {
    let data: MeetingNamesData = client.execute(&meeting_names_query(session)).await?;
    Ok(data.meeting_names)
}

pub async fn search_meetings<X: Transport>(
    client: &QueryClient<X>,
    query: &Query,
) -> QueryResult<Vec<Meeting>> {
    let data: MeetingsData<Meeting> = client.execute(query).await?;
    Ok(data.meetings)
}

/// Fetch one meeting by issue id; `None` if the catalogue has no such meeting.
pub async fn fetch_meeting<X: Transport>(
    client: &QueryClient<X>,
    issue_id: &str,
) -> QueryResult<Option<MeetingDetail>> {
    let data: MeetingsData<MeetingDetail> = client.execute(&meeting_query(issue_id)).await?;
    Ok(data.meetings.into_iter().next())
}
