use serde::{Deserialize, Serialize};

/// A single proxied request as recorded by the data plane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    /// Unix seconds
    pub created_at: i64,
    pub tags: Vec<String>,
    pub key_id: String,
    pub cost_in_usd: f64,
    pub provider: String,
    pub model: String,
    pub status: u16,
    pub prompt_token_count: i64,
    pub completion_token_count: i64,
    pub latency_in_ms: i64,
    pub path: String,
    pub method: String,
    pub custom_id: String,
    pub user_id: String,
}

/// Filters for the query-string event listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub user_id: Option<String>,
    pub custom_id: Option<String>,
    pub key_ids: Vec<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Structured event listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRequest {
    pub user_ids: Vec<String>,
    pub custom_ids: Vec<String>,
    pub key_ids: Vec<String>,
    pub tags: Vec<String>,
    pub start: i64,
    pub end: i64,
    pub limit: i64,
    pub offset: i64,
    pub return_count: bool,
}

/// Page of events with an optional total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventResponse {
    pub events: Vec<Event>,
    pub count: i64,
}

/// Aggregation request over a time window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportingRequest {
    pub key_ids: Vec<String>,
    pub tags: Vec<String>,
    pub custom_ids: Vec<String>,
    pub user_ids: Vec<String>,
    pub start: i64,
    pub end: i64,
    /// Bucket width in seconds
    pub increment: i64,
    /// Extra grouping dimensions: `model`, `keyId`, `customId`, `userId`, `path`
    pub filters: Vec<String>,
}

/// One aggregated bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataPoint {
    pub time_stamp: i64,
    pub number_of_requests: i64,
    pub cost_in_usd: f64,
    pub latency_in_ms: i64,
    pub prompt_token_count: i64,
    pub completion_token_count: i64,
    pub success_count: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// Result of a fixed-increment aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportingResponse {
    pub data_points: Vec<DataPoint>,
    pub latency_in_ms_median: f64,
    #[serde(rename = "latencyInMs99th")]
    pub latency_in_ms_99th: f64,
}

/// Result of a daily aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyReportingResponse {
    pub data_points: Vec<DataPoint>,
}

/// Ranking request for the most expensive keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyReportingRequest {
    pub key_ids: Vec<String>,
    pub tags: Vec<String>,
    /// `asc` or `desc` by cost
    pub order: String,
    pub start: i64,
    pub end: i64,
    pub limit: i64,
    pub offset: i64,
    pub return_count: bool,
}

/// Spend of one key inside a ranking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyCost {
    pub key_id: String,
    pub cost_in_usd: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyReportingResponse {
    pub key_reporting_data: Vec<KeyCost>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_field_keeps_wire_name() {
        let value = serde_json::to_value(ReportingResponse {
            latency_in_ms_99th: 42.0,
            ..ReportingResponse::default()
        })
        .unwrap();
        assert_eq!(value["latencyInMs99th"], 42.0);
        assert!(value.get("latencyInMsMedian").is_some());
    }

    #[test]
    fn empty_grouping_fields_are_omitted() {
        let value = serde_json::to_value(DataPoint {
            model: "gpt-4o".to_owned(),
            ..DataPoint::default()
        })
        .unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert!(value.get("keyId").is_none());
    }
}
