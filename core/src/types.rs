use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An operation text plus its variables, as posted to the endpoint.
///
/// Serializes to `{"query": ..., "variables": {...}}`. `variables` is left out
/// entirely when no variable was bound.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Query {
    #[serde(rename = "query")]
    operation: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    variables: Map<String, Value>,
}

impl Query {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            variables: Map::new(),
        }
    }

    /// Binds a variable. Binding the same name twice keeps the last value.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Response envelope returned by the endpoint
#[derive(Deserialize, Debug, Clone)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<QueryErrorEntry>>,
}

impl QueryResponse {
    /// Messages of all reported errors, in the order returned.
    pub fn error_messages(&self) -> Option<Vec<String>> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => {
                Some(errors.iter().map(|e| e.message.clone()).collect())
            }
            _ => None,
        }
    }
}

/// A single application-level error entry
#[derive(Deserialize, Debug, Clone)]
pub struct QueryErrorEntry {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_without_variables_omits_field() {
        let query = Query::new("query GetSessions { sessions { session name } }");
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(
            body,
            json!({ "query": "query GetSessions { sessions { session name } }" })
        );
    }

    #[test]
    fn test_query_variables_keep_nulls_and_lists() {
        let query = Query::new("q")
            .with_variable("session", 217)
            .with_variable("nameOfMeeting", None::<String>)
            .with_variable("houses", vec!["衆議院", "参議院"])
            .with_variable("session", 218);

        assert_eq!(query.variables().len(), 3);
        assert_eq!(query.variable("session"), Some(&json!(218)));
        assert_eq!(query.variable("nameOfMeeting"), Some(&Value::Null));

        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["variables"]["houses"], json!(["衆議院", "参議院"]));
    }

    #[test]
    fn test_response_error_messages() {
        let response: QueryResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "A" }, { "message": "B", "path": ["meetings"] }]
        }))
        .unwrap();
        assert_eq!(
            response.error_messages(),
            Some(vec!["A".to_string(), "B".to_string()])
        );

        let empty: QueryResponse =
            serde_json::from_value(json!({ "data": {}, "errors": [] })).unwrap();
        assert_eq!(empty.error_messages(), None);
    }
}
