use serde_json::Value;

use crate::outcome::{FetchOutcome, TransientReason};
use crate::record::FieldSchema;

/// Classifies a response body that made it over the wire.
///
/// Rules are evaluated in order:
/// 1. whitespace-only body is transient (upstream overload symptom),
/// 2. markup instead of structured data is transient (maintenance page),
/// 3. a body that fails JSON decoding is malformed,
/// 4. an absent or empty `row` list under the service key is the
///    end-of-data signal,
/// 5. anything else is a page of records, projected through `schema`.
///
/// Transport-level failures are classified by the fetcher before this
/// function is reached.
pub fn classify_body(body: &str, service_id: &str, schema: &FieldSchema) -> FetchOutcome {
    if body.trim().is_empty() {
        return FetchOutcome::TransientFailure(TransientReason::EmptyBody);
    }

    if body.to_lowercase().contains("<html") {
        return FetchOutcome::TransientFailure(TransientReason::MaintenancePage);
    }

    let decoded: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => return FetchOutcome::Malformed(err.to_string()),
    };

    let rows = decoded
        .get(service_id)
        .and_then(|service| service.get("row"))
        .and_then(Value::as_array);

    match rows {
        None => FetchOutcome::Empty,
        Some(rows) if rows.is_empty() => FetchOutcome::Empty,
        Some(rows) => FetchOutcome::Records(rows.iter().map(|row| schema.project(row)).collect()),
    }
}
