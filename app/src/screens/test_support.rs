use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kokkai_core::errors::TransportError;
use kokkai_core::{Query, QueryClient, RawResponse, RetryPolicy, StatusCode, Transport, Url};
use serde_json::{json, Value};

/// Answers catalogue operations from a small fixed data set and records
/// every query it receives.
#[derive(Debug, Clone, Default)]
pub struct FakeCatalogue {
    sent: Arc<Mutex<Vec<Query>>>,
    unavailable: Arc<AtomicBool>,
}

impl FakeCatalogue {
    pub fn client(&self) -> QueryClient<FakeCatalogue> {
        QueryClient::with_transport(
            self.clone(),
            Url::parse("http://catalogue.test/graphql").unwrap(),
            RetryPolicy::no_retry(),
        )
    }

    pub fn sent(&self) -> Vec<Query> {
        self.sent.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<Query> {
        self.sent()
            .into_iter()
            .filter(|q| q.operation().contains("query SearchMeetings"))
            .collect()
    }

    /// Make every following call answer 503
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeCatalogue {
    async fn send(&self, _endpoint: &Url, query: &Query) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(query.clone());
        if self.unavailable.load(Ordering::SeqCst) {
            return Ok(RawResponse::new(StatusCode::SERVICE_UNAVAILABLE, ""));
        }
        let body = json!({ "data": respond(query) });
        Ok(RawResponse::new(StatusCode::OK, body.to_string()))
    }
}

pub fn meetings() -> Vec<Value> {
    vec![
        json!({
            "issueId": "121705254X00120250218",
            "session": 217,
            "nameOfHouse": "衆議院",
            "nameOfMeeting": "内閣委員会",
            "issue": "第1号",
            "date": "2025-02-18",
            "meetingUrl": "https://kokkai.ndl.go.jp/txt/121705254X00120250218",
            "pdfUrl": null,
            "summary": { "summary": "## 決議された事項", "model": "gemini-2.5-flash" }
        }),
        json!({
            "issueId": "121714889X00220250311",
            "session": 217,
            "nameOfHouse": "参議院",
            "nameOfMeeting": "内閣委員会",
            "issue": "第2号",
            "date": "2025-03-11",
            "meetingUrl": "https://kokkai.ndl.go.jp/txt/121714889X00220250311",
            "pdfUrl": null,
            "summary": null
        }),
        json!({
            "issueId": "121814184X00120250801",
            "session": 218,
            "nameOfHouse": "参議院",
            "nameOfMeeting": "議院運営委員会",
            "issue": "第1号",
            "date": "2025-08-01",
            "meetingUrl": "https://kokkai.ndl.go.jp/txt/121814184X00120250801",
            "pdfUrl": null,
            "summary": null
        }),
    ]
}

fn matches(meeting: &Value, query: &Query, field: &str) -> bool {
    match query.variable(field) {
        None | Some(Value::Null) => true,
        Some(wanted) => meeting.get(field) == Some(wanted),
    }
}

fn respond(query: &Query) -> Value {
    let op = query.operation();
    if op.contains("query GetSessions") {
        json!({ "sessions": [
            { "session": 217, "name": "第217回 常会" },
            { "session": 218, "name": "第218回 臨時会" }
        ] })
    } else if op.contains("query GetMeetingNames") {
        let session = query.variable("session").cloned().unwrap_or(Value::Null);
        let mut names: Vec<Value> = meetings()
            .into_iter()
            .filter(|m| m["session"] == session)
            .map(|m| m["nameOfMeeting"].clone())
            .collect();
        names.dedup();
        json!({ "meetingNames": names })
    } else if op.contains("query SearchMeetings") {
        let found: Vec<Value> = meetings()
            .into_iter()
            .filter(|m| {
                matches(m, query, "session")
                    && matches(m, query, "nameOfMeeting")
                    && matches(m, query, "nameOfHouse")
            })
            .collect();
        json!({ "meetings": found })
    } else if op.contains("query GetMeeting(") {
        let found: Vec<Value> = meetings()
            .into_iter()
            .filter(|m| matches(m, query, "issueId"))
            .collect();
        json!({ "meetings": found })
    } else {
        Value::Null
    }
}
