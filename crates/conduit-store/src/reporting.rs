//! Usage reporting over an in-memory event log
//!
//! Events are appended with [`MemoryReporting::record_event`]. Time windows
//! are `[start, end)` in unix seconds; an `end` of zero leaves the window
//! open.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use conduit_core::model::{
    DailyReportingResponse, DataPoint, Event, EventQuery, EventRequest, EventResponse, KeyCost, KeyReporting,
    KeyReportingRequest, KeyReportingResponse, ReportingRequest, ReportingResponse,
};
use conduit_core::{KeyReportingManager, ManagerError};
use tokio::sync::RwLock;

use crate::{new_id, now, page, shares_tag};

const SECONDS_PER_DAY: i64 = 86_400;

/// Grouping dimensions accepted in `ReportingRequest::filters`
const DIMENSIONS: [&str; 5] = ["model", "keyId", "customId", "userId", "path"];

/// Append-only event log with the reporting queries on top
#[derive(Default)]
pub struct MemoryReporting {
    events: RwLock<Vec<Event>>,
}

impl MemoryReporting {
    /// Append an event, filling in its id and timestamp when absent
    pub async fn record_event(&self, mut event: Event) {
        if event.id.is_empty() {
            event.id = new_id();
        }
        if event.created_at == 0 {
            event.created_at = now();
        }
        self.events.write().await.push(event);
    }

    async fn matching(&self, keep: impl Fn(&Event) -> bool) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.read().await.iter().filter(|e| keep(e)).cloned().collect();
        events.sort_by_key(|event| event.created_at);
        events
    }
}

fn in_window(event: &Event, start: i64, end: i64) -> bool {
    event.created_at >= start && (end <= 0 || event.created_at < end)
}

/// Empty filter lists match everything
fn any_of(value: &str, wanted: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|w| w == value)
}

fn validate_paging(offset: i64, limit: i64) -> Result<(), ManagerError> {
    if offset < 0 || limit < 0 {
        return Err(ManagerError::validation("limit and offset can not be negative"));
    }
    Ok(())
}

fn validate_window(start: i64, end: i64) -> Result<(), ManagerError> {
    if start <= 0 || end <= 0 {
        return Err(ManagerError::validation("start and end are required"));
    }
    if start >= end {
        return Err(ManagerError::validation("start must be before end"));
    }
    Ok(())
}

fn count(len: usize, requested: bool) -> i64 {
    if requested { i64::try_from(len).unwrap_or(i64::MAX) } else { 0 }
}

fn dimension<'a>(event: &'a Event, name: &str) -> &'a str {
    match name {
        "model" => &event.model,
        "keyId" => &event.key_id,
        "customId" => &event.custom_id,
        "userId" => &event.user_id,
        "path" => &event.path,
        _ => "",
    }
}

#[derive(Default)]
struct Bucket {
    requests: i64,
    cost_in_usd: f64,
    latency_in_ms: i64,
    prompt_token_count: i64,
    completion_token_count: i64,
    success_count: i64,
}

/// Sum events into buckets keyed by `bucket_of(created_at)` and the
/// requested dimensions
fn aggregate(events: &[Event], filters: &[String], bucket_of: impl Fn(i64) -> i64) -> Result<Vec<DataPoint>, ManagerError> {
    if let Some(unknown) = filters.iter().find(|f| !DIMENSIONS.contains(&f.as_str())) {
        return Err(ManagerError::validation(format!("filter `{unknown}` is not supported")));
    }

    let mut buckets: BTreeMap<(i64, Vec<String>), Bucket> = BTreeMap::new();
    for event in events {
        let dimensions = filters.iter().map(|f| dimension(event, f).to_owned()).collect();
        let bucket = buckets.entry((bucket_of(event.created_at), dimensions)).or_default();

        bucket.requests += 1;
        bucket.cost_in_usd += event.cost_in_usd;
        bucket.latency_in_ms += event.latency_in_ms;
        bucket.prompt_token_count += event.prompt_token_count;
        bucket.completion_token_count += event.completion_token_count;
        if (200..300).contains(&event.status) {
            bucket.success_count += 1;
        }
    }

    Ok(buckets
        .into_iter()
        .map(|((time_stamp, dimensions), bucket)| {
            let mut point = DataPoint {
                time_stamp,
                number_of_requests: bucket.requests,
                cost_in_usd: bucket.cost_in_usd,
                latency_in_ms: bucket.latency_in_ms / bucket.requests.max(1),
                prompt_token_count: bucket.prompt_token_count,
                completion_token_count: bucket.completion_token_count,
                success_count: bucket.success_count,
                ..DataPoint::default()
            };

            for (name, value) in filters.iter().zip(dimensions) {
                match name.as_str() {
                    "model" => point.model = value,
                    "keyId" => point.key_id = value,
                    "customId" => point.custom_id = value,
                    "userId" => point.user_id = value,
                    _ => point.path = value,
                }
            }

            point
        })
        .collect())
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[allow(clippy::cast_precision_loss)]
fn latency_stats(events: &[Event]) -> (f64, f64) {
    let mut latencies: Vec<f64> = events.iter().map(|e| e.latency_in_ms as f64).collect();
    latencies.sort_by(f64::total_cmp);
    (percentile(&latencies, 0.50), percentile(&latencies, 0.99))
}

#[allow(clippy::cast_possible_truncation)]
fn micro_dollars(usd: f64) -> i64 {
    (usd * 1_000_000.0).round() as i64
}

fn distinct(events: &[Event], field: impl Fn(&Event) -> &str) -> Vec<String> {
    events
        .iter()
        .map(field)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn reporting_filter(request: &ReportingRequest) -> impl Fn(&Event) -> bool + '_ {
    move |event| {
        in_window(event, request.start, request.end)
            && any_of(&event.key_id, &request.key_ids)
            && any_of(&event.custom_id, &request.custom_ids)
            && any_of(&event.user_id, &request.user_ids)
            && (request.tags.is_empty() || shares_tag(&event.tags, &request.tags))
    }
}

#[async_trait]
impl KeyReportingManager for MemoryReporting {
    async fn get_key_reporting(&self, key_id: &str) -> Result<KeyReporting, ManagerError> {
        let events = self.matching(|event| event.key_id == key_id).await;
        if events.is_empty() {
            return Err(ManagerError::not_found(format!("no events recorded for key {key_id}")));
        }

        Ok(KeyReporting {
            id: key_id.to_owned(),
            cost_in_micro_dollars: micro_dollars(events.iter().map(|e| e.cost_in_usd).sum()),
        })
    }

    async fn get_top_key_reporting(&self, request: KeyReportingRequest) -> Result<KeyReportingResponse, ManagerError> {
        validate_paging(request.offset, request.limit)?;

        let events = self
            .matching(|event| {
                in_window(event, request.start, request.end)
                    && any_of(&event.key_id, &request.key_ids)
                    && (request.tags.is_empty() || shares_tag(&event.tags, &request.tags))
            })
            .await;

        let mut totals: HashMap<String, f64> = HashMap::new();
        for event in &events {
            *totals.entry(event.key_id.clone()).or_default() += event.cost_in_usd;
        }

        let mut ranked: Vec<KeyCost> = totals
            .into_iter()
            .map(|(key_id, cost_in_usd)| KeyCost { key_id, cost_in_usd })
            .collect();
        ranked.sort_by(|a, b| {
            b.cost_in_usd
                .total_cmp(&a.cost_in_usd)
                .then_with(|| a.key_id.cmp(&b.key_id))
        });
        if request.order.eq_ignore_ascii_case("asc") {
            ranked.reverse();
        }

        let count = count(ranked.len(), request.return_count);
        Ok(KeyReportingResponse {
            key_reporting_data: page(ranked, request.offset, request.limit),
            count,
        })
    }

    async fn get_events(&self, query: EventQuery) -> Result<Vec<Event>, ManagerError> {
        let start = query.start.unwrap_or(0);
        let end = query.end.unwrap_or(0);

        Ok(self
            .matching(|event| {
                in_window(event, start, end)
                    && query.user_id.as_deref().is_none_or(|id| event.user_id == id)
                    && query.custom_id.as_deref().is_none_or(|id| event.custom_id == id)
                    && any_of(&event.key_id, &query.key_ids)
            })
            .await)
    }

    async fn get_events_v2(&self, request: EventRequest) -> Result<EventResponse, ManagerError> {
        validate_paging(request.offset, request.limit)?;

        let events = self
            .matching(|event| {
                in_window(event, request.start, request.end)
                    && any_of(&event.user_id, &request.user_ids)
                    && any_of(&event.custom_id, &request.custom_ids)
                    && any_of(&event.key_id, &request.key_ids)
                    && (request.tags.is_empty() || shares_tag(&event.tags, &request.tags))
            })
            .await;

        let count = count(events.len(), request.return_count);
        Ok(EventResponse {
            events: page(events, request.offset, request.limit),
            count,
        })
    }

    async fn get_event_reporting(&self, request: ReportingRequest) -> Result<ReportingResponse, ManagerError> {
        validate_window(request.start, request.end)?;
        if request.increment <= 0 {
            return Err(ManagerError::validation("increment must be positive"));
        }

        let events = self.matching(reporting_filter(&request)).await;
        let start = request.start;
        let increment = request.increment;
        let data_points = aggregate(&events, &request.filters, |at| {
            start + (at - start) / increment * increment
        })?;
        let (latency_in_ms_median, latency_in_ms_99th) = latency_stats(&events);

        Ok(ReportingResponse {
            data_points,
            latency_in_ms_median,
            latency_in_ms_99th,
        })
    }

    async fn get_aggregated_event_by_day_reporting(
        &self,
        request: ReportingRequest,
    ) -> Result<DailyReportingResponse, ManagerError> {
        validate_window(request.start, request.end)?;

        let events = self.matching(reporting_filter(&request)).await;
        let data_points = aggregate(&events, &request.filters, |at| at - at.rem_euclid(SECONDS_PER_DAY))?;

        Ok(DailyReportingResponse { data_points })
    }

    async fn get_user_ids(&self, key_id: &str) -> Result<Vec<String>, ManagerError> {
        let events = self.matching(|event| event.key_id == key_id).await;
        Ok(distinct(&events, |event| event.user_id.as_str()))
    }

    async fn get_custom_ids(&self, key_id: &str) -> Result<Vec<String>, ManagerError> {
        let events = self.matching(|event| event.key_id == key_id).await;
        Ok(distinct(&events, |event| event.custom_id.as_str()))
    }
}
