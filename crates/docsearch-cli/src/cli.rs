//! CLI definition and command dispatch for docsearch.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that drives a document search session.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--endpoint`, `--language`)
//! 2. Environment variables (`DOCSEARCH_ENDPOINT`, `DOCSEARCH_LANGUAGE`, ...)
//! 3. Config file (`~/.docsearch/config.yaml` or path from `--config`/`DOCSEARCH_CONFIG`)
//! 4. Built-in defaults

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use docsearch_core::{
    build_filter, split_fragment, AnalysisTab, ClientConfig, DocSearchError, DocSearchResult,
    DocumentKind, DocumentSearchSession, EventOutcome, FilterPair, SearchSession, SearchStatus,
    SessionEvent, SessionOptions, SettingChange, SettingOutcome, SilentPlayer,
};
use docsearch_http::HttpBackend;

use crate::ui::color::terminal_width;
use crate::ui::{format, table, ColorMode, MessageType, Progress, ProgressMode, Style};

type Session = DocumentSearchSession<HttpBackend, SilentPlayer>;

// ============================================================================
// CLI Definition
// ============================================================================

/// Document search from the terminal
#[derive(Parser, Debug)]
#[command(name = "docsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "DOCSEARCH_VERBOSE")]
    pub verbose: bool,

    /// Suppress progress and informational messages
    #[arg(short, long, global = true, env = "DOCSEARCH_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.docsearch/config.yaml)
    #[arg(long, global = true, env = "DOCSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend endpoint (overrides the config file)
    #[arg(long, global = true, env = "DOCSEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Query language (overrides the config file)
    #[arg(long, global = true, env = "DOCSEARCH_LANGUAGE")]
    pub language: Option<String>,

    /// Color output mode: always, never, or auto
    #[arg(long, global = true, env = "DOCSEARCH_COLOR", default_value = "auto")]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the filter expression for category and field filters
    #[command(after_help = r#"EXAMPLES:
    # Include two categories
    docsearch filter --include-category hr,finance

    # Combine categories with field filters
    docsearch filter --exclude-category drafts --filter author="O'Brien"
"#)]
    Filter {
        /// Comma-separated categories to include
        #[arg(long, default_value = "")]
        include_category: String,

        /// Comma-separated categories to exclude
        #[arg(long, default_value = "")]
        exclude_category: String,

        /// Field equality filter (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<FilterPair>,
    },

    /// Show deployment features and the effective retrieval options
    #[command(after_help = r#"EXAMPLES:
    # Show options and visibility
    docsearch features

    # Output as JSON
    docsearch features --json
"#)]
    Features {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run one search and print the results
    #[command(after_help = r#"EXAMPLES:
    # Simple search
    docsearch search dental coverage

    # Limit results and restrict to a category
    docsearch search "expense policy" --top 5 --include-category finance

    # Adjust retrieval settings for this search
    docsearch search invoice --set useSemanticCaptions=true --set retrievalMode=hybrid

    # Output as JSON
    docsearch search invoice --json
"#)]
    Search {
        /// Text to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of results to request
        #[arg(long)]
        top: Option<u32>,

        /// Comma-separated categories to include
        #[arg(long)]
        include_category: Option<String>,

        /// Comma-separated categories to exclude
        #[arg(long)]
        exclude_category: Option<String>,

        /// Field equality filter (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<FilterPair>,

        /// Retrieval setting override (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        settings: Vec<(String, String)>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    #[command(after_help = r#"COMMANDS:
    <text>                 Submit a query
    :set <field> <value>   Change a retrieval setting
    :cite <path>           Show (or hide) a citation
    :tab <name>            Toggle citation | thought | supporting
    :select <n>            Select result n
    :play <url> / :stop    Play or stop a spoken answer
    :lang <code>           Change the query language
    :state                 Print the session state
    :quit                  Leave the shell
"#)]
    Shell,

    /// Inspect the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings
    #[command(after_help = r#"EXAMPLES:
    # Validate the config file
    docsearch config check

    # Output as JSON
    docsearch config check --json
"#)]
    Check {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration
    #[command(after_help = r#"EXAMPLES:
    # Show resolved config
    docsearch config show

    # Output as JSON
    docsearch config show --json
"#)]
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Parse `field=value` for `--set`.
fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected `field=value`, got '{}'", raw)),
    }
}

// ============================================================================
// Configuration resolution
// ============================================================================

/// Where the client configuration comes from, plus flag/env overrides.
#[derive(Debug, Clone)]
struct ConfigSource {
    path: Option<PathBuf>,
    endpoint: Option<String>,
    language: Option<String>,
}

impl ConfigSource {
    fn path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(ClientConfig::default_path)
    }

    /// Load the file (or defaults) and apply overrides.
    fn load(&self) -> DocSearchResult<ClientConfig> {
        let mut config = match &self.path {
            Some(path) => ClientConfig::from_path(path)?,
            None => ClientConfig::load_default()?,
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Run function
// ============================================================================

/// Run the CLI application.
///
/// Returns `ExitCode::SUCCESS` on success, or `ExitCode::FAILURE` on error
/// (including a search that ends in the error state).
pub fn run() -> ExitCode {
    let Cli {
        verbose,
        quiet,
        config,
        endpoint,
        language,
        color,
        command,
    } = Cli::parse();

    // Warnings always (degraded features, rejected settings); debug with --verbose
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = format!(
        "docsearch_core={level},docsearch_http={level},docsearch_cli={level}",
        level = log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let style = Style::new(color);
    let source = ConfigSource {
        path: config,
        endpoint,
        language,
    };

    let result = match command {
        Command::Filter {
            include_category,
            exclude_category,
            filters,
        } => handle_filter(&style, &include_category, &exclude_category, &filters),
        Command::Config { action } => handle_config(&style, &source, action),
        command => match source.load() {
            Ok(client) => match command {
                Command::Features { json } => handle_features(&style, &client, json),
                Command::Search {
                    query,
                    top,
                    include_category,
                    exclude_category,
                    filters,
                    settings,
                    json,
                } => {
                    let overrides = SearchOverrides {
                        top,
                        include_category,
                        exclude_category,
                        filters,
                        settings,
                    };
                    handle_search(&style, &client, quiet, &query.join(" "), overrides, json)
                }
                Command::Shell => handle_shell(&style, &client, quiet),
                Command::Filter { .. } | Command::Config { .. } => Ok(()),
            },
            Err(e) => Err(e.into()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&style, &e));
            ExitCode::FAILURE
        }
    }
}

/// Turn an error into `[err]` output with cause and hint where known.
fn render_error(style: &Style, error: &anyhow::Error) -> String {
    match error.downcast_ref::<DocSearchError>() {
        Some(DocSearchError::InvalidConfiguration { message, hint }) => style.error_with_context(
            "Invalid configuration",
            Some(message.as_str()),
            Some(hint.as_str()),
        ),
        Some(DocSearchError::InvalidClientConfig { path, message }) => style.error_with_context(
            "Failed to load client configuration",
            Some(message.as_str()),
            Some(&format!("Check your config at {}", path.display())),
        ),
        Some(DocSearchError::SearchTransport(cause)) => style.error_with_context(
            "Search failed",
            Some(cause.as_str()),
            Some("Check that the backend is reachable (--endpoint / DOCSEARCH_ENDPOINT)"),
        ),
        _ => style.message(MessageType::Err, &format!("{:#}", error)),
    }
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Start a session against the configured backend.
fn start_session(rt: &Runtime, client: &ClientConfig) -> Result<Session> {
    let backend = HttpBackend::new(
        &client.endpoint,
        Duration::from_secs(client.request_timeout_secs),
    )?;
    let options = SessionOptions::from_client_config(client)?;
    tracing::debug!(endpoint = %backend.endpoint(), ?options, "Starting session");
    Ok(rt.block_on(DocumentSearchSession::start(
        backend.clone(),
        SilentPlayer,
        &backend,
        options,
    )))
}

/// Apply one change. Refusals are only logged.
fn change_setting(rt: &Runtime, session: &mut Session, change: SettingChange) -> Result<SettingOutcome> {
    let field = change.field();
    let outcome = match rt.block_on(session.handle(SessionEvent::ChangeSetting(change)))? {
        EventOutcome::Setting(outcome) => outcome,
        other => return Err(anyhow!("Unexpected outcome for `{}`: {:?}", field, other)),
    };
    if let SettingOutcome::Rejected(e) = &outcome {
        tracing::warn!("{}", e);
    }
    Ok(outcome)
}

/// Submit a query with a spinner. Returns false for a blank query.
fn submit_query(rt: &Runtime, session: &mut Session, query: &str, mode: ProgressMode) -> Result<bool> {
    let progress = Progress::spinner(&format!("Searching for \"{}\"", query), mode);
    let outcome = rt.block_on(session.handle(SessionEvent::SubmitQuery(query.to_string())));
    progress.finish_clear();
    Ok(outcome? != EventOutcome::Ignored)
}

fn print_results(style: &Style, search: &SearchSession) {
    if search.results.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("No results found for \"{}\"", search.query)
            )
        );
        return;
    }

    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "{} result(s) for \"{}\" in {}",
                search.results.len(),
                search.query,
                format::format_elapsed(search.submitted_at, search.completed_at)
            )
        )
    );
    println!();
    let content_width = terminal_width().saturating_sub(50).max(20);
    println!("{}", table::render_results_table(&search.results, content_width));
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_filter(
    style: &Style,
    include_category: &str,
    exclude_category: &str,
    filters: &[FilterPair],
) -> Result<()> {
    let expression = build_filter(include_category, exclude_category, filters);
    if expression.is_empty() {
        println!(
            "{}",
            style.message(MessageType::Info, "No filter clauses; every document matches")
        );
    } else {
        println!("{}", expression);
    }
    Ok(())
}

fn handle_features(style: &Style, client: &ClientConfig, json: bool) -> Result<()> {
    let rt = runtime()?;
    let session = start_session(&rt, client)?;

    if json {
        let payload = serde_json::json!({
            "endpoint": client.endpoint,
            "features": session.features(),
            "config": session.config(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", style.key_value("Endpoint", &client.endpoint));
    println!();
    println!("{}", style.section("OPTIONS"));
    println!("{}", table::render_options_table(session.config()));
    println!();
    println!("{}", style.section("VISIBILITY"));
    println!("{}", table::render_visibility_table(session.config()));
    Ok(())
}

/// Per-invocation setting overrides for `docsearch search`.
struct SearchOverrides {
    top: Option<u32>,
    include_category: Option<String>,
    exclude_category: Option<String>,
    filters: Vec<FilterPair>,
    settings: Vec<(String, String)>,
}

impl SearchOverrides {
    /// Convert into setting changes; `--set` first, then the dedicated flags.
    fn into_changes(self, style: &Style, quiet: bool) -> Result<Vec<SettingChange>> {
        let mut changes = Vec::new();
        for (field, raw) in &self.settings {
            match SettingChange::parse(field, raw)? {
                Some(change) => changes.push(change),
                None if !quiet => eprintln!(
                    "{}",
                    style.message(
                        MessageType::Skip,
                        &format!("Unknown setting '{}' ignored", field)
                    )
                ),
                None => {}
            }
        }
        if let Some(top) = self.top {
            changes.push(SettingChange::RetrieveCount(top));
        }
        if let Some(include) = self.include_category {
            changes.push(SettingChange::IncludeCategory(include));
        }
        if let Some(exclude) = self.exclude_category {
            changes.push(SettingChange::ExcludeCategory(exclude));
        }
        changes.extend(self.filters.into_iter().map(SettingChange::AddFilter));
        Ok(changes)
    }
}

fn handle_search(
    style: &Style,
    client: &ClientConfig,
    quiet: bool,
    query: &str,
    overrides: SearchOverrides,
    json: bool,
) -> Result<()> {
    let rt = runtime()?;
    let mut session = start_session(&rt, client)?;

    for change in overrides.into_changes(style, quiet)? {
        change_setting(&rt, &mut session, change)?;
    }

    if !submit_query(&rt, &mut session, query, ProgressMode::detect(quiet, json))? {
        bail!("Query is empty");
    }

    let search = session
        .search()
        .session()
        .ok_or_else(|| anyhow!("Search was not recorded"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(search)?);
    }

    match search.status {
        SearchStatus::Success if !json => print_results(style, search),
        SearchStatus::Error => {
            let cause = search.error.clone().unwrap_or_default();
            return Err(DocSearchError::SearchTransport(cause).into());
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// Shell
// ============================================================================

/// One line of shell input.
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Query(String),
    Set { field: String, value: String },
    Cite(String),
    Tab(AnalysisTab),
    Select(usize),
    Play(String),
    Stop,
    Lang(String),
    State,
    Help,
    Quit,
}

fn parse_shell_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(ShellCommand::Query(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let require = |what: &str| -> std::result::Result<String, String> {
        if args.is_empty() {
            Err(format!("Usage: :{} <{}>", name, what))
        } else {
            Ok(args.to_string())
        }
    };

    match name {
        "set" => {
            let args = require("field> <value")?;
            let (field, value) = args
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f.to_string(), v.trim().to_string()))
                .unwrap_or((args, String::new()));
            Ok(ShellCommand::Set { field, value })
        }
        "cite" => Ok(ShellCommand::Cite(require("path")?)),
        "tab" => Ok(ShellCommand::Tab(require("tab")?.parse()?)),
        "select" => {
            let n: usize = require("n")?
                .parse()
                .map_err(|_| format!("Not a result number: '{}'", args))?;
            Ok(ShellCommand::Select(n))
        }
        "play" => Ok(ShellCommand::Play(require("url")?)),
        "stop" => Ok(ShellCommand::Stop),
        "lang" => Ok(ShellCommand::Lang(require("code")?)),
        "state" => Ok(ShellCommand::State),
        "help" | "h" => Ok(ShellCommand::Help),
        "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command ':{}'. Type :help for commands", other)),
    }
}

fn print_state(style: &Style, session: &Session) {
    let search = session.search();
    let selection = session.selection();
    let query = search.session().map(|s| s.query.as_str());
    let error = search.session().and_then(|s| s.error.as_deref());
    let tab = selection.active_tab().map(|t| t.to_string());
    let selected = selection
        .selected_result(search.results())
        .map(|d| d.display_title());

    println!("{}", style.key_value("Status", &style.status(search.status())));
    println!("{}", style.key_value("Query", format::or_dash(query)));
    println!("{}", style.key_value("Results", &search.results().len().to_string()));
    if let Some(error) = error {
        println!("{}", style.key_value("Error", error));
    }
    println!(
        "{}",
        style.key_value("Citation", format::or_dash(selection.active_citation()))
    );
    println!("{}", style.key_value("Tab", format::or_dash(tab.as_deref())));
    println!("{}", style.key_value("Selected", format::or_dash(selected.as_deref())));
    println!(
        "{}",
        style.key_value("Playing", format::or_dash(session.playback().current()))
    );
    println!("{}", style.key_value("Language", session.language()));
}

fn describe_citation(style: &Style, session: &Session) -> String {
    match session.selection().active_citation() {
        Some(citation) => {
            let (path, fragment) = split_fragment(citation);
            let kind = match DocumentKind::from_path(citation) {
                DocumentKind::Image => "image",
                DocumentKind::Markdown => "markdown",
                DocumentKind::Embedded => "document",
            };
            let detail = match fragment {
                Some(fragment) => format!("{}, {}", kind, fragment),
                None => kind.to_string(),
            };
            style.message(
                MessageType::Info,
                &format!("Citation: {} ({})", style.file_path(path), detail),
            )
        }
        None => style.message(MessageType::Info, "Citation closed"),
    }
}

fn run_shell_command(
    style: &Style,
    rt: &Runtime,
    session: &mut Session,
    command: ShellCommand,
    mode: ProgressMode,
) -> Result<()> {
    match command {
        ShellCommand::Query(query) => {
            if !submit_query(rt, session, &query, mode)? {
                return Ok(());
            }
            if let Some(search) = session.search().session() {
                match search.status {
                    SearchStatus::Error => eprintln!(
                        "{}",
                        style.error_with_context(
                            "Search failed",
                            search.error.as_deref(),
                            None
                        )
                    ),
                    _ => print_results(style, search),
                }
            }
        }
        ShellCommand::Set { field, value } => match SettingChange::parse(&field, &value) {
            Ok(Some(change)) => {
                if change_setting(rt, session, change)?.is_applied() {
                    println!(
                        "{}",
                        style.message(MessageType::Ok, &format!("{} updated", field))
                    );
                }
            }
            Ok(None) => println!(
                "{}",
                style.message(
                    MessageType::Skip,
                    &format!("Unknown setting '{}' ignored", field)
                )
            ),
            Err(e) => eprintln!("{}", style.message(MessageType::Err, &e.to_string())),
        },
        ShellCommand::Cite(id) => {
            rt.block_on(session.handle(SessionEvent::ShowCitation(id)))?;
            println!("{}", describe_citation(style, session));
        }
        ShellCommand::Tab(tab) => {
            rt.block_on(session.handle(SessionEvent::ToggleTab(tab)))?;
            let text = match session.selection().active_tab() {
                Some(tab) => format!("Tab: {}", tab),
                None => "Tab closed".to_string(),
            };
            println!("{}", style.message(MessageType::Info, &text));
        }
        ShellCommand::Select(n) => {
            let count = session.search().results().len();
            if n == 0 || n > count {
                eprintln!(
                    "{}",
                    style.message(
                        MessageType::Warn,
                        &format!("No result #{} ({} available)", n, count)
                    )
                );
                return Ok(());
            }
            rt.block_on(session.handle(SessionEvent::SelectResult(n - 1)))?;
            let title = session
                .selection()
                .selected_result(session.search().results())
                .map(|d| d.display_title())
                .unwrap_or_default();
            println!(
                "{}",
                style.message(
                    MessageType::Info,
                    &format!("Selected #{}: {}", n, style.title(&title))
                )
            );
        }
        ShellCommand::Play(url) => {
            rt.block_on(session.handle(SessionEvent::PlaySpeech(url.clone())))?;
            println!(
                "{}",
                style.message(MessageType::Info, &format!("Playing {}", url))
            );
        }
        ShellCommand::Stop => {
            rt.block_on(session.handle(SessionEvent::StopSpeech))?;
            println!("{}", style.message(MessageType::Info, "Playback stopped"));
        }
        ShellCommand::Lang(code) => {
            session.set_language(code.clone());
            println!(
                "{}",
                style.message(MessageType::Ok, &format!("Language set to {}", code))
            );
        }
        ShellCommand::State => print_state(style, session),
        ShellCommand::Help => println!(
            "{}",
            style.message(
                MessageType::Hint,
                "Type a query, or one of :set :cite :tab :select :play :stop :lang :state :quit"
            )
        ),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn handle_shell(style: &Style, client: &ClientConfig, quiet: bool) -> Result<()> {
    let rt = runtime()?;
    let mut session = start_session(&rt, client)?;

    let interactive = std::io::stdin().is_terminal();
    let mode = ProgressMode::detect(quiet || !interactive, false);
    if interactive && !quiet {
        println!(
            "{}",
            style.message(MessageType::Hint, "Type a query, or :help for commands")
        );
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_shell_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => run_shell_command(style, &rt, &mut session, command, mode)?,
            Err(message) => eprintln!("{}", style.message(MessageType::Err, &message)),
        }
    }
    Ok(())
}

// ============================================================================
// Config
// ============================================================================

fn handle_config(style: &Style, source: &ConfigSource, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Check { json } => handle_config_check(style, source, json),
        ConfigAction::Show { json } => handle_config_show(style, source, json),
    }
}

/// Validate the configuration file and report errors/warnings.
fn handle_config_check(style: &Style, source: &ConfigSource, json: bool) -> Result<()> {
    let path = source.path();
    let exists = path.as_ref().map(|p| p.exists()).unwrap_or(false);

    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    match source.load() {
        Ok(config) => warnings = config.validate()?,
        Err(e) => errors.push(e.to_string()),
    }

    if json {
        let report = serde_json::json!({
            "path": path,
            "exists": exists,
            "valid": errors.is_empty(),
            "warnings": warnings,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let location = match &path {
            Some(p) if exists => p.display().to_string(),
            Some(p) => format!("{} (not found, using defaults)", p.display()),
            None => "(no home directory, using defaults)".to_string(),
        };
        println!(
            "{}",
            style.message(MessageType::Info, &format!("Checked {}", location))
        );

        if !warnings.is_empty() {
            println!(
                "{}",
                style.message(MessageType::Warn, &format!("{} warning(s):", warnings.len()))
            );
            for warning in &warnings {
                println!("  • {}", warning);
            }
        }

        if !errors.is_empty() {
            println!(
                "{}",
                style.message(MessageType::Err, &format!("{} error(s):", errors.len()))
            );
            for error in &errors {
                println!("  • {}", error);
            }
        }

        if errors.is_empty() && warnings.is_empty() {
            println!("{}", style.message(MessageType::Ok, "Configuration is valid"));
        } else if errors.is_empty() {
            println!(
                "{}",
                style.message(MessageType::Ok, "Configuration is valid with warnings")
            );
        }
    }

    if !errors.is_empty() {
        return Err(DocSearchError::InvalidConfiguration {
            message: format!("{} configuration error(s) found", errors.len()),
            hint: "Fix the values listed above or remove them to use defaults".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Show the resolved configuration (file, environment and flags merged).
fn handle_config_show(style: &Style, source: &ConfigSource, json: bool) -> Result<()> {
    let config = source.load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = source
        .path()
        .filter(|p| p.exists())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!(
        "{}",
        style.message(MessageType::Info, &format!("Resolved configuration ({})", path))
    );
    println!();
    println!("{}", style.key_value("endpoint", &config.endpoint));
    println!("{}", style.key_value("language", &config.language));
    println!(
        "{}",
        style.key_value("semanticConfiguration", &config.semantic_configuration)
    );
    println!(
        "{}",
        style.key_value("requestTimeoutSecs", &config.request_timeout_secs.to_string())
    );
    println!(
        "{}",
        style.key_value("auth.tokenEnv", format::or_dash(config.token_env()))
    );
    if config.settings.is_empty() {
        println!("{}", style.key_value("settings", "-"));
    } else {
        println!("{}", style.section("settings"));
        for (field, value) in &config.settings {
            println!("  {}", style.key_value(field, &value.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("retrieveCount=5"),
            Ok(("retrieveCount".to_string(), "5".to_string()))
        );
        assert_eq!(
            parse_assignment("filter=a=b"),
            Ok(("filter".to_string(), "a=b".to_string()))
        );
        assert!(parse_assignment("=5").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_parse_shell_query() {
        assert_eq!(
            parse_shell_line("  dental coverage "),
            Ok(ShellCommand::Query("dental coverage".to_string()))
        );
    }

    #[test]
    fn test_parse_shell_commands() {
        assert_eq!(
            parse_shell_line(":set temperature 0.5"),
            Ok(ShellCommand::Set {
                field: "temperature".to_string(),
                value: "0.5".to_string()
            })
        );
        assert_eq!(
            parse_shell_line(":set includeCategory hr, finance"),
            Ok(ShellCommand::Set {
                field: "includeCategory".to_string(),
                value: "hr, finance".to_string()
            })
        );
        assert_eq!(
            parse_shell_line(":cite doc1.pdf#page=2"),
            Ok(ShellCommand::Cite("doc1.pdf#page=2".to_string()))
        );
        assert_eq!(
            parse_shell_line(":tab thought"),
            Ok(ShellCommand::Tab(AnalysisTab::ThoughtProcess))
        );
        assert_eq!(parse_shell_line(":select 2"), Ok(ShellCommand::Select(2)));
        assert_eq!(parse_shell_line(":q"), Ok(ShellCommand::Quit));
        assert_eq!(parse_shell_line(":state"), Ok(ShellCommand::State));
    }

    #[test]
    fn test_parse_shell_errors() {
        assert!(parse_shell_line(":cite").is_err());
        assert!(parse_shell_line(":tab sideways").is_err());
        assert!(parse_shell_line(":select two").is_err());
        assert!(parse_shell_line(":frobnicate").is_err());
    }

    #[test]
    fn test_overrides_order() {
        let style = Style::new(ColorMode::Never);
        let overrides = SearchOverrides {
            top: Some(5),
            include_category: Some("hr".to_string()),
            exclude_category: None,
            filters: vec![FilterPair::new("author", "Kim")],
            settings: vec![
                ("temperature".to_string(), "0.1".to_string()),
                ("futureKnob".to_string(), "1".to_string()),
            ],
        };
        let changes = overrides.into_changes(&style, true).unwrap();
        assert_eq!(
            changes,
            vec![
                SettingChange::Temperature(0.1),
                SettingChange::RetrieveCount(5),
                SettingChange::IncludeCategory("hr".to_string()),
                SettingChange::AddFilter(FilterPair::new("author", "Kim")),
            ]
        );
    }

    #[test]
    fn test_render_error_hints() {
        let style = Style::new(ColorMode::Never);
        let err: anyhow::Error = DocSearchError::SearchTransport("timeout".to_string()).into();
        let output = render_error(&style, &err);
        assert!(output.contains("[err] Search failed"));
        assert!(output.contains("Cause: timeout"));

        let err = anyhow!("plain failure");
        assert_eq!(render_error(&style, &err), "[err] plain failure");
    }
}
