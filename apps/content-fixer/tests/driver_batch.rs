mod common;

use common::{block, document, image};
use compliance_engine::ComplianceEngine;
use content_fixer::driver::{BatchDriver, RunMode, RunOptions};
use content_fixer::store::{DocumentQuery, MemoryStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{decode_blocks, BlockStyle, IssueCategory, Severity};
use std::sync::Arc;

fn query() -> DocumentQuery {
    DocumentQuery::new("blogPost", "body")
}

fn driver(store: Arc<MemoryStore>, mode: RunMode) -> BatchDriver {
    BatchDriver::new(store, ComplianceEngine::new(), RunOptions::new(mode))
}

#[tokio::test]
async fn test_clean_document_is_not_committed() {
    let store = Arc::new(MemoryStore::new(vec![document(
        "post-1",
        "roasts",
        vec![block("a", "A proper Sunday roast keeps regulars coming back."), image("img")],
    )]));

    let summary = driver(store.clone(), RunMode::Fix).run(&query()).await;

    assert_eq!(summary.documents_scanned, 1);
    assert_eq!(summary.documents_changed, 0);
    assert_eq!(summary.total_changes(), 0);
    assert!(store.commits().is_empty());
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_fix_commits_whole_body_once() {
    let store = Arc::new(MemoryStore::new(vec![document(
        "post-1",
        "feedback",
        vec![
            block("a", "**Opening: Acknowledge and Appreciate**\nThank you for your feedback."),
            image("img"),
            block("b", "We've helped hundreds of pubs increase revenue."),
        ],
    )]));

    let summary = driver(store.clone(), RunMode::Fix).run(&query()).await;

    let commits = store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].id, "post-1");
    assert_eq!(commits[0].field, "body");
    assert_eq!(commits[0].blocks.len(), 4);

    let heading = commits[0].blocks[0].as_text().unwrap();
    assert_eq!(heading.style, BlockStyle::Heading(3));
    assert_eq!(heading.plain_text(), "Opening: Acknowledge and Appreciate");
    assert_eq!(
        commits[0].blocks[1].as_text().unwrap().plain_text(),
        "Thank you for your feedback."
    );
    assert!(commits[0].blocks[2].as_text().is_none());
    assert_eq!(
        commits[0].blocks[3].as_text().unwrap().plain_text(),
        "Industry data shows many pubs can increase revenue."
    );

    assert_eq!(summary.documents_changed, 1);
    assert_eq!(summary.format_fixes, 1);
    assert_eq!(summary.changes_by_category[&IssueCategory::ClientNumbers], 1);
    assert_eq!(summary.changes_by_category[&IssueCategory::DirectResults], 1);
    assert!(summary.documents[0].committed);
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let store = Arc::new(MemoryStore::new(vec![document(
        "post-1",
        "growth",
        vec![
            block("a", "## Quiet Tuesdays\nOur clients typically see a 30% uplift."),
            block("b", "Use **bold** sparingly, and **NEVER** skip the **£5** deal."),
        ],
    )]));

    let first = driver(store.clone(), RunMode::Fix).run(&query()).await;
    assert_eq!(first.documents_changed, 1);

    let second = driver(store.clone(), RunMode::Fix).run(&query()).await;
    assert_eq!(second.documents_changed, 0);
    assert_eq!(second.total_changes(), 0);
    assert_eq!(second.markdown_issues, 0);
    assert_eq!(store.commits().len(), 1);

    let stored = store.document("post-1").unwrap();
    let blocks = decode_blocks(&stored.body).unwrap();
    assert!(blocks
        .iter()
        .filter_map(|block| block.as_text())
        .all(|block| !block.plain_text().contains("**")));
}

#[tokio::test]
async fn test_failures_do_not_stop_the_batch() {
    let store = Arc::new(
        MemoryStore::new(vec![
            document("bad-shape", "one", vec![json!("not a block")]),
            document("conflict", "two", vec![block("a", "We've worked with over 300 venues.")]),
            document("fine", "three", vec![block("a", "One of our clients saw a big lift.")]),
        ])
        .with_commit_failure("conflict"),
    );

    let summary = driver(store.clone(), RunMode::Fix).run(&query()).await;

    assert_eq!(summary.documents_scanned, 3);
    let failed: Vec<&str> = summary.failures.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(failed, vec!["bad-shape", "conflict"]);
    assert!(summary.failures[1].error.contains("conflict"));
    assert_eq!(summary.documents_changed, 1);
    assert_eq!(store.commits()[0].id, "fine");
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_analyze_reports_without_writing() {
    let store = Arc::new(MemoryStore::new(vec![document(
        "post-1",
        "claims",
        vec![block("a", "We've helped hundreds of pubs increase revenue.")],
    )]));

    let summary = driver(store.clone(), RunMode::Analyze).run(&query()).await;

    assert!(store.commits().is_empty());
    assert_eq!(summary.documents_with_findings, 1);
    assert_eq!(summary.documents_changed, 0);
    assert!(summary.count_for(Severity::High) > 0);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_allow_listed_claim_is_kept() {
    let store = Arc::new(MemoryStore::new(vec![document(
        "post-1",
        "anchor",
        vec![block("a", "The Anchor increased Sunday sales by 20%")],
    )]));

    let summary = driver(store.clone(), RunMode::Fix).run(&query()).await;
    assert_eq!(summary.total_changes(), 0);
    assert!(store.commits().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_sets_exit_code() {
    let store = Arc::new(MemoryStore::default().with_fetch_failure("connection refused"));

    let summary = driver(store, RunMode::Analyze).run(&query()).await;

    assert_eq!(summary.documents_scanned, 0);
    assert!(summary.fetch_error.as_deref().unwrap().contains("connection refused"));
    assert_eq!(summary.exit_code(), 2);
}

#[tokio::test]
async fn test_slug_filter() {
    let store = Arc::new(MemoryStore::new(vec![
        document("a", "one", vec![block("a", "We've worked with over 300 venues.")]),
        document("b", "two", vec![block("a", "We've worked with over 300 venues.")]),
    ]));

    let summary = driver(store.clone(), RunMode::Fix)
        .run(&query().with_slugs(["two"]))
        .await;

    assert_eq!(summary.documents_scanned, 1);
    assert_eq!(store.commits()[0].id, "b");
}
