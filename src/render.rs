//! Plain-text rendering of session state for the terminal shell.

use crate::backend::{HealthReport, Role, SearchResult, SourceRef, UploadedFileRecord};
use crate::session::{
    ChatController, SearchController, StatsSync, UploadOrchestrator, UploadStatus,
    UploadStatusKind,
};
use std::fmt::Write as _;

/// Relevance as a whole percentage, e.g. `91% match`. Halves round away from zero.
pub fn match_label(score: f64) -> String {
    format!("{:.0}% match", (score * 100.0).round())
}

/// Citation line shown under an answer, e.g. `config.md (chunk 0)`.
pub fn citation_line(source: &SourceRef) -> String {
    format!("{} (chunk {})", source.filename, source.chunk_index)
}

/// Corpus banner, present once stats have loaded.
pub fn stats_banner(stats: &StatsSync) -> Option<String> {
    stats
        .snapshot()
        .map(|snapshot| format!("{} chunks indexed", snapshot.total_chunks))
}

/// Upload status line with a marker for its phase.
pub fn status_line(status: &UploadStatus) -> String {
    match status.kind {
        UploadStatusKind::Loading => format!("… {}", status.message),
        UploadStatusKind::Success | UploadStatusKind::Error => status.message.clone(),
    }
}

/// One recent-upload row: name, chunk count, size in KB, and detected type.
pub fn upload_row(record: &UploadedFileRecord) -> String {
    let kb = record.size_bytes as f64 / 1024.0;
    format!(
        "{} — {} chunks • {kb:.1} KB [{}]",
        record.filename, record.chunks_created, record.file_type
    )
}

/// Upload view: status banner and the most recent uploads.
pub fn upload_view(uploads: &UploadOrchestrator) -> String {
    let mut out = String::new();
    if let Some(status) = uploads.status() {
        let _ = writeln!(out, "{}", status_line(status));
    }
    out.push_str(&recent_uploads(uploads));
    out
}

/// The recent-uploads list, most recent first; empty until something succeeds.
pub fn recent_uploads(uploads: &UploadOrchestrator) -> String {
    let mut out = String::new();
    if !uploads.records().is_empty() {
        out.push_str("Recently Uploaded\n");
        for record in uploads.recent() {
            let _ = writeln!(out, "  {}", upload_row(record));
        }
    }
    out
}

/// One result card: header line plus indented preview.
pub fn result_card(result: &SearchResult) -> String {
    format!(
        "{} · Chunk {} · {}\n    {}",
        result.filename,
        result.chunk_index,
        match_label(result.relevance_score),
        result.text_preview
    )
}

/// Search view: in-flight marker, result cards, or the empty-state message.
pub fn search_view(search: &SearchController) -> String {
    let mut out = String::new();
    if search.is_searching() {
        out.push_str("Searching...\n");
    }
    for result in search.results() {
        let _ = writeln!(out, "{}", result_card(result));
    }
    if search.shows_no_results() {
        out.push_str("No results found. Try a different query.\n");
    }
    out
}

/// Chat view: every turn in order, citations under answers, and a pending marker.
pub fn chat_view(chat: &ChatController) -> String {
    let mut out = String::new();
    if chat.turns().is_empty() {
        out.push_str("Ask anything about your documentation\n");
        out.push_str("I'll search and provide answers with citations\n");
    }

    for turn in chat.turns() {
        let speaker = match (turn.role, turn.is_error) {
            (Role::User, _) => "you",
            (Role::Assistant, false) => "assistant",
            (Role::Assistant, true) => "assistant (error)",
        };
        let _ = writeln!(out, "{speaker}> {}", turn.content);

        if let Some(sources) = turn.sources.as_ref()
            && !sources.is_empty()
        {
            out.push_str("  Sources:\n");
            for source in sources {
                let _ = writeln!(out, "  • {}", citation_line(source));
            }
        }
    }

    if chat.is_loading() {
        out.push_str("assistant> ...\n");
    }
    out
}

/// Health report summary.
pub fn health_view(report: &HealthReport) -> String {
    let mut out = format!(
        "status: {}\ngeneration available: {}\n",
        report.status,
        if report.ollama_available { "yes" } else { "no" }
    );
    if let Some(chunks) = report.indexed_chunks {
        let _ = writeln!(out, "indexed chunks: {chunks}");
    }
    if let Some(model) = report.embedding_model.as_deref() {
        let _ = writeln!(out, "embedding model: {model}");
    }
    out
}
