use std::fmt;

use crate::record::Record;

/// Classification of a single fetch attempt.
///
/// Produced once per HTTP attempt and consumed immediately; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page decoded into one or more projected records, in source order.
    Records(Vec<Record>),
    /// The upstream record list is absent or empty. This is the
    /// authoritative end-of-data signal, not a failure.
    Empty,
    /// A failure worth retrying against the same range.
    TransientFailure(TransientReason),
    /// The body was structured data but failed to decode. Retried the same
    /// way as a transient failure; kept separate for diagnostics only.
    Malformed(String),
}

/// Why a fetch attempt was classified as transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientReason {
    /// Connection refused, timeout, DNS failure and friends.
    Network(String),
    /// Empty or whitespace-only body, seen when the upstream is overloaded.
    EmptyBody,
    /// Markup instead of structured data, seen during upstream maintenance.
    MaintenancePage,
}

impl fmt::Display for TransientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientReason::Network(message) => write!(f, "network error: {message}"),
            TransientReason::EmptyBody => write!(f, "empty response body"),
            TransientReason::MaintenancePage => write!(f, "markup response (maintenance page?)"),
        }
    }
}

/// Final verdict for one page after retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Records(Vec<Record>),
    Empty,
    /// All attempts for this range were exhausted without a decisive outcome.
    GiveUp,
}

/// How a harvest run ended. Both variants leave the sink consistent and
/// resumable from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The upstream reported no more data.
    EndOfData,
    /// A page stayed unavailable through every retry.
    GaveUp,
}

impl Completion {
    pub fn completed_normally(&self) -> bool {
        matches!(self, Completion::EndOfData)
    }
}
