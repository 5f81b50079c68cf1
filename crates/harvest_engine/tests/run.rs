use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use harvest_core::{
    Completion, FetchOutcome, FieldSchema, PageRange, Record, TransientReason,
};
use harvest_engine::{run_harvest, CsvSink, PageFetcher, RetryPolicy};

/// Replays a fixed script of outcomes and records every requested range.
struct ScriptedFetcher {
    outcomes: Mutex<VecDeque<FetchOutcome>>,
    seen: Mutex<Vec<PageRange>>,
}

impl ScriptedFetcher {
    fn new(outcomes: impl IntoIterator<Item = FetchOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<PageRange> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, range: PageRange) -> FetchOutcome {
        self.seen.lock().unwrap().push(range);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

fn schema() -> FieldSchema {
    FieldSchema::new(["BAR_CD", "PRDLST_NM"])
}

fn record(barcode: &str, name: &str) -> Record {
    Record::new(vec![barcode.to_string(), name.to_string()])
}

fn transient() -> FetchOutcome {
    FetchOutcome::TransientFailure(TransientReason::EmptyBody)
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        retry_delay: Duration::ZERO,
    }
}

fn first_page() -> PageRange {
    PageRange::new(1, 100).unwrap()
}

async fn harvest_to_tempfile(
    fetcher: &ScriptedFetcher,
) -> (TempDir, harvest_engine::RunSummary, String) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out.csv");
    let sink = CsvSink::create(&path, &schema()).unwrap();

    let summary = run_harvest(fetcher, &policy(), &sink, first_page(), Duration::ZERO)
        .await
        .unwrap();
    let content = fs::read_to_string(&path).unwrap();
    (temp, summary, content)
}

#[tokio::test]
async fn records_then_empty_commits_one_page() {
    let fetcher = ScriptedFetcher::new([
        FetchOutcome::Records(vec![
            record("8801", "Noodles"),
            record("8802", "Kimchi"),
            record("8803", "Tea"),
        ]),
        FetchOutcome::Empty,
    ]);

    let (_temp, summary, content) = harvest_to_tempfile(&fetcher).await;

    assert_eq!(
        content,
        "BAR_CD,PRDLST_NM\n8801,Noodles\n8802,Kimchi\n8803,Tea\n"
    );
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.records, 3);
    assert_eq!(summary.completion, Completion::EndOfData);
    assert!(summary.completion.completed_normally());

    // Exactly two page attempts, with the cursor advanced by the window size.
    assert_eq!(
        fetcher.seen(),
        vec![
            PageRange::new(1, 100).unwrap(),
            PageRange::new(101, 200).unwrap(),
        ]
    );
    assert_eq!(summary.next_start, 101);
}

#[tokio::test]
async fn empty_on_the_very_first_page_is_a_valid_run() {
    let fetcher = ScriptedFetcher::new([FetchOutcome::Empty]);

    let (_temp, summary, content) = harvest_to_tempfile(&fetcher).await;

    assert_eq!(content, "BAR_CD,PRDLST_NM\n");
    assert_eq!(summary.pages, 0);
    assert_eq!(summary.records, 0);
    assert_eq!(summary.completion, Completion::EndOfData);
    assert_eq!(summary.next_start, 1);
}

#[tokio::test]
async fn two_transients_then_records_commits_the_page() {
    let fetcher = ScriptedFetcher::new([
        transient(),
        transient(),
        FetchOutcome::Records(vec![record("8801", "Noodles")]),
        FetchOutcome::Empty,
    ]);

    let (_temp, summary, content) = harvest_to_tempfile(&fetcher).await;

    assert_eq!(content, "BAR_CD,PRDLST_NM\n8801,Noodles\n");
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.records, 1);

    // Three fetch attempts for the first page, one for the second.
    let seen = fetcher.seen();
    assert_eq!(seen.len(), 4);
    assert_eq!(&seen[..3], &[first_page(); 3]);
    assert_eq!(seen[3], PageRange::new(101, 200).unwrap());
}

#[tokio::test]
async fn exhausted_first_page_leaves_header_only() {
    let fetcher = ScriptedFetcher::new([transient(), transient(), transient()]);

    let (_temp, summary, content) = harvest_to_tempfile(&fetcher).await;

    assert_eq!(content, "BAR_CD,PRDLST_NM\n");
    assert_eq!(summary.pages, 0);
    assert_eq!(summary.completion, Completion::GaveUp);
    assert!(!summary.completion.completed_normally());
    assert_eq!(summary.next_start, 1);
    assert_eq!(fetcher.seen().len(), 3);
}

#[tokio::test]
async fn give_up_keeps_previously_committed_pages() {
    let fetcher = ScriptedFetcher::new([
        FetchOutcome::Records(vec![record("8801", "Noodles"), record("8802", "Kimchi")]),
        transient(),
        transient(),
        transient(),
    ]);

    let (_temp, summary, content) = harvest_to_tempfile(&fetcher).await;

    assert_eq!(content, "BAR_CD,PRDLST_NM\n8801,Noodles\n8802,Kimchi\n");
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.completion, Completion::GaveUp);
    // The failed page starts where a resumed run should pick up.
    assert_eq!(summary.next_start, 101);
}
