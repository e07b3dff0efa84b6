use documind::{
    backend::{DocumentApiClient, UploadFile},
    config::Config,
    render,
    session::{Session, UploadStatusKind, Workflows},
};
use httpmock::{
    Method::{GET, POST},
    MockServer,
};
use serde_json::json;
use std::time::Duration;

fn session_for(base_url: String) -> Session<DocumentApiClient> {
    let config = Config {
        api_url: base_url,
        ..Config::default()
    };
    Session::new(DocumentApiClient::new(&config).expect("client"))
}

fn upload(name: &str) -> UploadFile {
    UploadFile::new(name, format!("# {name}\n\nBody text."))
}

#[tokio::test]
async fn batch_with_middle_failure_keeps_successes_in_order() {
    let server = MockServer::start_async().await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/documents/stats");
            then.status(200)
                .json_body(json!({ "total_chunks": 12, "collection_name": "documents" }));
        })
        .await;
    for (name, chunks) in [("one.md", 3), ("three.md", 5)] {
        server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/documents/upload")
                    .body_contains(format!("filename=\"{name}\""));
                then.status(200).json_body(json!({
                    "filename": name,
                    "chunks_created": chunks,
                    "size": 2048,
                    "file_type": "markdown"
                }));
            })
            .await;
    }
    let rejected = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/documents/upload")
                .body_contains("filename=\"two.md\"");
            then.status(400)
                .json_body(json!({ "detail": "No text content could be extracted" }));
        })
        .await;

    let mut session = session_for(server.base_url());
    session.mount().await;

    let mut transitions = Vec::new();
    let summary = session
        .upload(
            vec![upload("one.md"), upload("two.md"), upload("three.md")],
            |status| transitions.push(status.clone()),
        )
        .await;

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    rejected.assert_async().await;
    stats.assert_hits_async(3).await;

    assert_eq!(transitions.len(), 6);
    assert_eq!(transitions[3].kind, UploadStatusKind::Error);
    assert_eq!(
        transitions[3].message,
        "✗ Error: No text content could be extracted"
    );

    let recent: Vec<_> = session
        .uploads()
        .recent()
        .map(|record| record.filename.as_str())
        .collect();
    assert_eq!(recent, vec!["three.md", "one.md"]);
    let status = session.uploads().status().expect("final status");
    assert_eq!(status.kind, UploadStatusKind::Success);
    assert_eq!(status.message, "✓ three.md processed into 5 chunks");
    assert_eq!(
        render::stats_banner(session.stats()).as_deref(),
        Some("12 chunks indexed")
    );
}

#[tokio::test]
async fn search_scenario_renders_match_percentage() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search/semantic")
                .json_body(json!({ "query": "how do I configure retries", "top_k": 5 }));
            then.status(200).json_body(json!({
                "results": [{
                    "filename": "retry.md",
                    "chunk_index": 2,
                    "relevance_score": 0.91,
                    "text_preview": "Retries are configured via..."
                }]
            }));
        })
        .await;

    let mut session = session_for(server.base_url());
    assert!(session.run_search("how do I configure retries").await);

    search.assert_async().await;
    assert_eq!(session.search().results().len(), 1);
    let view = render::search_view(session.search());
    assert!(view.contains("retry.md · Chunk 2 · 91% match"));
    assert!(view.contains("Retries are configured via..."));
    assert!(!view.contains("No results found"));
}

#[tokio::test]
async fn search_with_no_hits_shows_empty_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/search/semantic");
            then.status(200).json_body(json!({ "results": [] }));
        })
        .await;

    let mut session = session_for(server.base_url());
    session.run_search("nothing matches this").await;

    assert!(session.search().shows_no_results());
    assert!(render::search_view(session.search()).contains("No results found"));
}

#[tokio::test]
async fn chat_scenario_appends_answer_with_citation() {
    let server = MockServer::start_async().await;
    let ask = server
        .mock_async(|when, then| {
            when.method(POST).path("/search/ask").json_body(json!({
                "query": "What timeout applies?",
                "top_k": 5,
                "conversation_history": []
            }));
            then.status(200).json_body(json!({
                "answer": "30 seconds.",
                "sources": [{ "filename": "config.md", "chunk_index": 0 }]
            }));
        })
        .await;

    let mut session = session_for(server.base_url());
    assert!(session.ask("What timeout applies?").await);

    ask.assert_async().await;
    let turns = session.chat().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "What timeout applies?");
    assert_eq!(turns[1].content, "30 seconds.");
    let view = render::chat_view(session.chat());
    assert!(view.contains("• config.md (chunk 0)"));
}

#[tokio::test]
async fn chat_server_error_becomes_error_turn() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/search/ask");
            then.status(500)
                .json_body(json!({ "detail": "index unavailable" }));
        })
        .await;

    let mut session = session_for(server.base_url());
    session.ask("anything?").await;

    let last = session.chat().turns().last().expect("assistant turn");
    assert!(last.is_error);
    assert_eq!(last.content, "Error: index unavailable");
    assert!(!session.chat().is_loading());
}

#[tokio::test]
async fn unreachable_service_degrades_every_workflow_locally() {
    let mut session = session_for("http://127.0.0.1:9".into());
    session.mount().await;
    assert!(session.stats().snapshot().is_none());

    let summary = session
        .upload(vec![upload("a.md"), upload("b.md")], |_| {})
        .await;
    assert_eq!(summary.failed, 2);
    assert!(session.uploads().records().is_empty());
    let status = session.uploads().status().expect("status");
    assert!(status.message.starts_with("✗ Upload failed: "));

    assert!(session.run_search("anything").await);
    assert!(session.search().results().is_empty());

    session.ask("still there?").await;
    let turns = session.chat().turns();
    assert_eq!(turns.len(), 2);
    assert!(turns[1].is_error);
    assert!(turns[1].content.starts_with("Error: "));
}

#[tokio::test]
async fn search_and_chat_complete_while_an_upload_is_in_flight() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/documents/upload");
            then.status(200)
                .delay(Duration::from_millis(800))
                .json_body(json!({
                    "filename": "slow.pdf",
                    "chunks_created": 40,
                    "size": 81920,
                    "file_type": "pdf"
                }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/documents/stats");
            then.status(200).json_body(json!({ "total_chunks": 40 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/search/semantic");
            then.status(200).json_body(json!({
                "results": [{
                    "filename": "retry.md",
                    "chunk_index": 2,
                    "relevance_score": 0.91,
                    "text_preview": "Retries are configured via..."
                }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/search/ask");
            then.status(200).json_body(json!({ "answer": "30 seconds.", "sources": [] }));
        })
        .await;

    let mut session = session_for(server.base_url());
    let Workflows {
        api,
        stats,
        uploads,
        search,
        chat,
    } = session.split_mut();

    search.set_input("how do I configure retries");
    chat.set_input("What timeout applies?");

    let summary = {
        let batch = uploads.upload_batch(api, stats, vec![upload("slow.pdf")], |_| {});
        tokio::pin!(batch);

        let (searched, asked) = tokio::select! {
            _ = &mut batch => panic!("upload finished before search and chat"),
            pair = async { tokio::join!(search.submit(api), chat.submit(api)) } => pair,
        };
        assert!(searched && asked);
        assert_eq!(search.results().len(), 1);
        assert_eq!(chat.turns()[1].content, "30 seconds.");

        batch.await
    };
    assert_eq!(summary.succeeded, 1);
    assert_eq!(uploads.records()[0].filename, "slow.pdf");
    assert_eq!(
        render::stats_banner(stats).as_deref(),
        Some("40 chunks indexed")
    );
}
