use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use documind::{
    backend::{ApiError, CorpusStats, DocumentApi, DocumentApiClient, HealthReport},
    config, logging, render,
    session::{
        ActiveView, AskOutcome, SearchOutcome, Session, UploadOutcome, Workflows,
        is_supported_file,
    },
};
use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "documind",
    about = "Upload, search, and chat with your documentation"
)]
struct Cli {
    /// Document service base URL (overrides DOCUMIND_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Upload files (directories are expanded recursively), one at a time.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Run a semantic search.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Ask a single question.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Show corpus statistics.
    Stats,
    /// Probe the search and generation backends.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url)?;
    }
    logging::init_tracing(config.log_file.as_deref());

    let client =
        DocumentApiClient::new(&config).context("failed to build document service client")?;
    tracing::info!(url = client.base_url(), "Using document service");
    let mut session = Session::new(client);
    session.mount().await;

    match cli.command {
        Some(Command::Upload { paths }) => upload(&mut session, &paths).await,
        Some(Command::Search { query }) => {
            session.run_search(&query.join(" ")).await;
            print!("{}", render::search_view(session.search()));
        }
        Some(Command::Ask { question }) => {
            session.ask(&question.join(" ")).await;
            print!("{}", render::chat_view(session.chat()));
        }
        Some(Command::Stats) => print_stats(&session),
        Some(Command::Health) => {
            let report = session
                .api()
                .health()
                .await
                .context("health check failed")?;
            print!("{}", render::health_view(&report));
        }
        None => interactive(session).await?,
    }

    Ok(())
}

async fn upload(session: &mut Session<DocumentApiClient>, paths: &[PathBuf]) {
    let files = collect_files(paths);
    if files.is_empty() {
        println!("No supported files selected.");
        return;
    }

    session
        .upload(files, |status| println!("{}", render::status_line(status)))
        .await;
    print!("{}", render::recent_uploads(session.uploads()));
    print_stats(session);
}

fn print_stats(session: &Session<DocumentApiClient>) {
    match render::stats_banner(session.stats()) {
        Some(banner) => println!("{banner}"),
        None => println!("Stats unavailable"),
    }
}

/// Expand directories and drop files the picker would not offer, keeping selection order.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
            {
                if is_supported_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if is_supported_file(path) {
            files.push(path.clone());
        } else {
            tracing::warn!(path = %path.display(), "Skipping unsupported file type");
        }
    }
    files
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Switch(ActiveView),
    Stats,
    Health,
    Help,
    Quit,
    Text(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":upload" | ":u" => Input::Switch(ActiveView::Upload),
        ":search" | ":s" => Input::Switch(ActiveView::Search),
        ":chat" | ":c" => Input::Switch(ActiveView::Chat),
        ":stats" => Input::Stats,
        ":health" => Input::Health,
        ":help" | ":h" => Input::Help,
        ":quit" | ":q" => Input::Quit,
        _ => Input::Text(line),
    }
}

const HELP: &str = "\
:upload :search :chat   switch view (state is kept per view)
:stats :health          corpus stats / backend health
:quit                   exit
upload view: type file or directory paths; quote paths that contain spaces
search view: type a query
chat view:   type a question
requests run in the background; views can be switched while they are pending";

/// Split an upload line into paths. Single or double quotes group words containing spaces.
fn split_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut pending = false;

    for ch in text.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                pending = true;
            }
            None if ch.is_whitespace() => {
                if pending {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                    pending = false;
                }
            }
            None => {
                current.push(ch);
                pending = true;
            }
        }
    }
    if pending && !current.is_empty() {
        paths.push(PathBuf::from(current));
    }
    paths.retain(|path| !path.as_os_str().is_empty());
    paths
}

/// Result of a request that ran in the background of the interactive shell.
enum Completion {
    Upload {
        outcome: UploadOutcome,
        stats: Option<Result<CorpusStats, ApiError>>,
    },
    Search(SearchOutcome),
    Ask(AskOutcome),
    Health(Result<HealthReport, ApiError>),
}

/// Interactive shell state: the session, queued upload paths, and in-flight requests.
struct Shell {
    session: Session<DocumentApiClient>,
    queue: VecDeque<PathBuf>,
    tasks: JoinSet<Completion>,
}

impl Shell {
    fn new(session: Session<DocumentApiClient>) -> Self {
        Self {
            session,
            queue: VecDeque::new(),
            tasks: JoinSet::new(),
        }
    }

    fn prompt(&self) -> Result<()> {
        print!("{}> ", self.session.active_view().label());
        std::io::stdout().flush().context("failed to flush prompt")
    }

    /// Act on one input line. Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_input(line) {
            Input::Switch(view) => {
                self.session.select(view);
                print!("{}", render_active(&self.session));
            }
            Input::Stats => print_stats(&self.session),
            Input::Health => {
                let api = self.session.api().clone();
                self.tasks
                    .spawn(async move { Completion::Health(api.health().await) });
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => return false,
            Input::Text(text) => match self.session.active_view() {
                ActiveView::Upload => self.queue_uploads(text),
                ActiveView::Search => self.start_search(text),
                ActiveView::Chat => self.start_ask(text),
            },
        }
        true
    }

    fn queue_uploads(&mut self, text: &str) {
        let files = collect_files(&split_paths(text));
        if files.is_empty() {
            println!("No supported files selected.");
            return;
        }
        self.queue.extend(files);
        self.start_next_upload();
    }

    /// Issue the next queued file unless one is already in flight, keeping uploads sequential.
    fn start_next_upload(&mut self) {
        if self.session.uploads().is_uploading() {
            return;
        }
        let Some(path) = self.queue.pop_front() else {
            return;
        };

        let api = self.session.api().clone();
        let Workflows { uploads, .. } = self.session.split_mut();
        let pending = uploads.begin_upload(path);
        if let Some(status) = uploads.status() {
            println!("{}", render::status_line(status));
        }

        self.tasks.spawn(async move {
            let outcome = pending.execute(&api).await;
            let stats = if outcome.is_success() {
                Some(api.fetch_stats().await)
            } else {
                None
            };
            Completion::Upload { outcome, stats }
        });
    }

    fn start_search(&mut self, text: &str) {
        let api = self.session.api().clone();
        let Workflows { search, .. } = self.session.split_mut();
        search.set_input(text);
        let Some(pending) = search.begin_search() else {
            return;
        };
        print!("{}", render::search_view(search));

        self.tasks
            .spawn(async move { Completion::Search(pending.execute(&api).await) });
    }

    fn start_ask(&mut self, text: &str) {
        let api = self.session.api().clone();
        let Workflows { chat, .. } = self.session.split_mut();
        chat.set_input(text);
        let Some(pending) = chat.begin_ask() else {
            return;
        };
        print!("{}", render::chat_view(chat));

        self.tasks
            .spawn(async move { Completion::Ask(pending.execute(&api).await) });
    }

    fn complete(&mut self, completion: Completion) {
        let active = self.session.active_view();
        let Workflows {
            stats,
            uploads,
            search,
            chat,
            ..
        } = self.session.split_mut();

        match completion {
            Completion::Upload {
                outcome,
                stats: fetched,
            } => {
                uploads.finish_upload(outcome);
                if let Some(status) = uploads.status() {
                    println!("{}", render::status_line(status));
                }
                if let Some(fetched) = fetched {
                    stats.apply(fetched);
                }
                self.start_next_upload();
                if !self.session.uploads().is_uploading() {
                    print!("{}", render::recent_uploads(self.session.uploads()));
                    print_stats(&self.session);
                }
            }
            Completion::Search(outcome) => {
                if search.apply(outcome) && active == ActiveView::Search {
                    print!("{}", render::search_view(search));
                }
            }
            Completion::Ask(outcome) => {
                chat.finish(outcome);
                if active == ActiveView::Chat {
                    print!("{}", render::chat_view(chat));
                }
            }
            Completion::Health(Ok(report)) => print!("{}", render::health_view(&report)),
            Completion::Health(Err(error)) => println!("Health check failed: {error}"),
        }
    }
}

async fn interactive(session: Session<DocumentApiClient>) -> Result<()> {
    println!("DocuMind — AI-Powered Technical Documentation Assistant");
    print_stats(&session);
    println!("{HELP}");

    let mut shell = Shell::new(session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if !shell.handle_line(&line) {
                    break;
                }
            }
            Some(joined) = shell.tasks.join_next() => match joined {
                Ok(completion) => {
                    println!();
                    shell.complete(completion);
                }
                Err(error) => tracing::error!(error = %error, "Background request panicked"),
            },
        }
    }

    Ok(())
}

fn render_active<A>(session: &Session<A>) -> String
where
    A: DocumentApi,
{
    match session.active_view() {
        ActiveView::Upload => render::upload_view(session.uploads()),
        ActiveView::Search => render::search_view(session.search()),
        ActiveView::Chat => render::chat_view(session.chat()),
    }
}
