use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use wikihop_core::report::{ReportFormat, SearchReport, generate_report, save_report};
use wikihop_core::search::{SearchError, SearchOptions, execute_search};
use wikihop_core::SearchConfig;

/// Exit code for a start title that cannot name an article.
pub const EXIT_INVALID_START: i32 = 2;

/// Banner and progress chatter go to stderr; stdout carries only the report.
pub fn print_banner() {
    eprintln!(
        "{} {}",
        "wikihop".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("{}", "six degrees of encyclopedia articles".dimmed());
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

/// Build a [`SearchConfig`] from the shared search options of a subcommand.
pub fn load_config_from_matches(matches: &ArgMatches) -> Result<SearchConfig, String> {
    let mut config = SearchConfig::default();

    if let Some(target) = matches.get_one::<String>("target") {
        config = config.with_target(target)?;
    }
    if let Some(api_url) = matches.get_one::<Url>("api-url") {
        config.api_url = api_url.clone();
    }
    if let Some(&workers) = matches.get_one::<usize>("workers") {
        config.workers = workers;
    }
    if let Some(&secs) = matches.get_one::<u64>("timeout") {
        config = config.with_budget_secs(secs);
    }
    if let Some(&secs) = matches.get_one::<u64>("request-timeout") {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(&retries) = matches.get_one::<u32>("retries") {
        config.max_retries = retries;
    }

    config.validate()?;
    Ok(config)
}

pub fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let ip: IpAddr = host
        .parse()
        .map_err(|e| format!("Invalid host '{}': {}", host, e))?;
    Ok(SocketAddr::new(ip, port))
}

/// Render the report, then either save it to `output` or write it to `out`.
pub fn emit_report(
    report: &SearchReport,
    format: ReportFormat,
    output: Option<&PathBuf>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let content = generate_report(report, format)
        .map_err(|e| format!("Failed to render report: {}", e))?;

    match output {
        Some(path) => {
            save_report(&content, path)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            eprintln!("{} Report saved to {}", "✓".green(), path.display());
        }
        None => {
            out.write_all(content.as_bytes())
                .and_then(|_| out.flush())
                .map_err(|e| format!("Failed to write report: {}", e))?;
        }
    }
    Ok(())
}

pub async fn handle_find(sub_matches: &ArgMatches, quiet: bool) {
    let config = match load_config_from_matches(sub_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let Some(start) = sub_matches.get_one::<String>("START") else {
        eprintln!("{} A starting page is required", "✗".red());
        std::process::exit(EXIT_INVALID_START);
    };
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = sub_matches.get_one::<PathBuf>("output");

    if !quiet {
        print_divider();
        eprintln!("{} {} → {}", "Searching".bold(), start, config.target);
        eprintln!("Workers: {}", config.workers);
        match config.budget {
            Some(budget) => eprintln!("Time limit: {}s", budget.as_secs()),
            None => eprintln!("Time limit: none"),
        }
        print_divider();
    }

    let options = SearchOptions {
        start: start.clone(),
        config,
        show_progress_bars: !quiet,
    };

    let report = match execute_search(options, None).await {
        Ok(report) => report,
        Err(SearchError::InvalidStart(e)) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(EXIT_INVALID_START);
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = emit_report(&report, format, output, &mut io::stdout()) {
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(1);
    }

    if !report.is_found() {
        std::process::exit(1);
    }
}

pub async fn handle_serve(sub_matches: &ArgMatches) {
    let config = match load_config_from_matches(sub_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let host = sub_matches
        .get_one::<String>("host")
        .map(String::as_str)
        .unwrap_or("127.0.0.1");
    let port = sub_matches.get_one::<u16>("port").copied().unwrap_or(8000);
    let addr = match resolve_bind_addr(host, port) {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    println!(
        "{} Serving paths to {} on http://{}",
        "▶".green(),
        config.target.to_string().bold(),
        addr
    );

    if let Err(e) = crate::server::serve(&config, addr).await {
        eprintln!("{} {:#}", "✗".red(), e);
        std::process::exit(1);
    }
}
