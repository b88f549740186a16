//! hnsearch CLI - Terminal front-end for browsing news search results

mod backend;
mod session;
mod view;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use hnsearch_client::{ClientConfig, HnSearchClient};
use hnsearch_core::SortKey;
use hnsearch_store::DEFAULT_QUERY;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend::BackendHandle;
use crate::session::{Command, Flow, Session};

fn main() -> Result<()> {
    // Initialize logging
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(env.as_deref())?)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = Options::parse(args)?;

    let command = args.first().map(String::as_str).unwrap_or("interactive");

    match command {
        "help" | "--help" | "-h" => print_help(),
        "search" => {
            let Some(query) = args.get(1) else {
                eprintln!("Usage: hnsearch search <term> [--pages N] [--sort KEY] [--reverse]");
                return Ok(());
            };
            search(&options, query)?;
        }
        "interactive" => {
            let query = args.get(1).map(String::as_str).unwrap_or(DEFAULT_QUERY);
            interactive(&options, query)?;
        }
        query => interactive(&options, query)?,
    }

    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "hnsearch=info,hnsearch_store=info,hnsearch_client=info";

/// `RUST_LOG` when set, otherwise info for our own crates
fn log_filter(env: Option<&str>) -> Result<EnvFilter> {
    let directives = env
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER);
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {:?}", directives))
}

/// Flags accepted anywhere on the command line
#[derive(Debug, Default, PartialEq)]
struct Options {
    url: Option<String>,
    hits_per_page: Option<u32>,
    pages: u32,
    sort: Option<SortKey>,
    reverse: bool,
}

impl Options {
    /// Split `args` into flags and positional arguments
    fn parse(args: Vec<String>) -> Result<(Self, Vec<String>)> {
        let mut options = Options {
            pages: 1,
            ..Options::default()
        };
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => options.url = Some(value(&mut args, "--url")?),
                "--hits-per-page" => {
                    options.hits_per_page = Some(
                        value(&mut args, "--hits-per-page")?
                            .parse()
                            .context("--hits-per-page expects a number")?,
                    )
                }
                "--pages" => {
                    options.pages = value(&mut args, "--pages")?
                        .parse()
                        .context("--pages expects a number")?
                }
                "--sort" => options.sort = Some(value(&mut args, "--sort")?.parse()?),
                "--reverse" => options.reverse = true,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                other => positional.push(other.to_string()),
            }
        }

        Ok((options, positional))
    }

    /// Environment configuration with command line overrides applied
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.url {
            config = config.with_base_url(url)?;
        }
        if let Some(hits_per_page) = self.hits_per_page {
            config = config.with_hits_per_page(hits_per_page)?;
        }
        Ok(config)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} expects a value", flag))
}

fn print_help() {
    println!(
        r#"hnsearch - Browse news search results from the terminal

USAGE:
    hnsearch [OPTIONS] [COMMAND] [TERM]

COMMANDS:
    help            Show this help message
    search <term>   Fetch results once and print them
    interactive     Start an interactive session (default)

OPTIONS:
    --url <URL>              Search API root (env HNSEARCH_API_URL)
    --hits-per-page <N>      Results per page (env HNSEARCH_HITS_PER_PAGE)
    --pages <N>              Pages to fetch with `search`
    --sort <KEY>             none, title, author, comments or points
    --reverse                Reverse the sort order

EXAMPLES:
    hnsearch
    hnsearch interactive rust
    hnsearch search redux --pages 3 --sort points
"#
    );
}

fn print_session_help() {
    println!(
        r#"COMMANDS:
    type <text>     Edit the query without searching
    submit          Search for the current query
    search <text>   Edit the query and search
    more            Load the next page
    dismiss <id>    Remove a result from the list
    sort <key>      Sort by none, title, author, comments or points
                    (repeat to reverse)
    show            Print the results again
    quit            Leave the session"#
    );
}

fn start_session(options: &Options, query: &str) -> Result<Session> {
    let config = options.client_config()?;
    info!(
        "Using {} with {} hits per page",
        config.base_url, config.hits_per_page
    );

    let timeout = config.timeout;
    let client = HnSearchClient::new(config)?;
    let backend = BackendHandle::spawn(Arc::new(client))?;

    let mut session = Session::new(query, backend);
    if let Some(timeout) = timeout {
        session = session.with_wait_limit(timeout + Duration::from_secs(5));
    }
    Ok(session)
}

fn search(options: &Options, query: &str) -> Result<()> {
    let mut session = start_session(options, query)?;
    let sort = options.sort.map(|key| (key, options.reverse));

    let result = session::run_once(&mut session, query, options.pages.max(1), sort);
    print!("{}", session.render(view::DEFAULT_WIDTH));
    session.teardown();
    result
}

fn interactive(options: &Options, query: &str) -> Result<()> {
    let mut session = start_session(options, query)?;
    info!("Starting session with query {:?}", query);

    if let Some(key) = options.sort {
        session.handle(Command::Sort(key))?;
        if options.reverse {
            session.handle(Command::Sort(key))?;
        }
    }

    report(session.handle(Command::Submit));
    print!("{}", session.render(view::DEFAULT_WIDTH));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == Command::Help {
            print_session_help();
            continue;
        }

        match report(session.handle(command)) {
            Flow::Exit => return Ok(()),
            Flow::Continue => print!("{}", session.render(view::DEFAULT_WIDTH)),
        }
    }

    session.teardown();
    Ok(())
}

/// Print a failed command; the session keeps running
fn report(result: Result<Flow>) -> Flow {
    result.unwrap_or_else(|e| {
        eprintln!("{:#}", e);
        Flow::Continue
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let (options, positional) = Options::parse(args(&[
            "search",
            "--pages",
            "3",
            "redux",
            "--sort",
            "points",
            "--reverse",
            "--url",
            "http://localhost:9000",
        ]))
        .unwrap();

        assert_eq!(positional, ["search", "redux"]);
        assert_eq!(options.pages, 3);
        assert_eq!(options.sort, Some(SortKey::Points));
        assert!(options.reverse);
        assert_eq!(options.url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(Options::parse(args(&["--pages"])).is_err());
        assert!(Options::parse(args(&["--pages", "many"])).is_err());
        assert!(Options::parse(args(&["--sort", "stars"])).is_err());
        assert!(Options::parse(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let (options, _) = Options::parse(args(&[
            "--url",
            "http://localhost:9000/api",
            "--hits-per-page",
            "50",
        ]))
        .unwrap();

        let config = options.client_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:9000/api");
        assert_eq!(config.hits_per_page, 50);
    }

    #[test]
    fn test_failed_command_keeps_session_running() {
        let timed_out = Err(anyhow::anyhow!("timed out waiting for search results"));
        assert_eq!(report(timed_out), Flow::Continue);
        assert_eq!(report(Ok(Flow::Exit)), Flow::Exit);
    }

    #[test]
    fn test_log_filter_keeps_env_levels() {
        let filter = log_filter(Some("hnsearch_store=debug")).unwrap().to_string();
        assert!(filter.contains("hnsearch_store=debug"));
        assert!(!filter.contains("hnsearch_store=info"));

        let filter = log_filter(None).unwrap().to_string();
        assert!(filter.contains("hnsearch_client=info"));
        assert_eq!(log_filter(Some(" ")).unwrap().to_string(), filter);

        assert!(log_filter(Some("hnsearch=loud")).is_err());
    }
}
