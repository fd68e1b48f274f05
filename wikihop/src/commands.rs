use clap::{Arg, arg, command};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Options shared by `find` and `serve`; each can also come from a
/// `WIKIHOP_*` environment variable.
fn search_args() -> Vec<Arg> {
    vec![
        arg!(--"target" <TITLE>)
            .required(false)
            .help("Article every search tries to reach")
            .env("WIKIHOP_TARGET")
            .default_value("Kevin_Bacon"),
        arg!(-w --"workers" <NUM_WORKERS>)
            .required(false)
            .help("Maximum number of page fetches in flight at once")
            .env("WIKIHOP_WORKERS")
            .value_parser(clap::value_parser!(usize))
            .default_value("5"),
        arg!(-t --"timeout" <SECONDS>)
            .required(false)
            .help("Give up on a search after this many seconds (0 = no limit)")
            .env("WIKIHOP_TIMEOUT")
            .value_parser(clap::value_parser!(u64))
            .default_value("30"),
        arg!(--"request-timeout" <SECONDS>)
            .required(false)
            .help("Timeout for a single page fetch in seconds")
            .env("WIKIHOP_REQUEST_TIMEOUT")
            .value_parser(clap::value_parser!(u64))
            .default_value("5"),
        arg!(--"retries" <NUM>)
            .required(false)
            .help("Retries for a rate-limited or unavailable page")
            .env("WIKIHOP_RETRIES")
            .value_parser(clap::value_parser!(u32))
            .default_value("2"),
        arg!(--"api-url" <URL>)
            .required(false)
            .help("REST endpoint serving page HTML at {api-url}/{title}")
            .env("WIKIHOP_API_URL")
            .value_parser(clap::value_parser!(Url))
            .default_value("https://en.wikipedia.org/api/rest_v1/page/html"),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikihop")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikihop")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("find")
                .about("Find the shortest chain of article links from START to the target")
                .arg(
                    arg!(<START>)
                        .required(true)
                        .help("Title of the article to start from, e.g. 'Footloose'"),
                )
                .args(search_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("serve")
                .about("Serve searches over HTTP at GET /{starting_page}")
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Address to bind")
                        .env("WIKIHOP_HOST")
                        .default_value("127.0.0.1"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on")
                        .env("WIKIHOP_PORT")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("8000"),
                )
                .args(search_args()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        command_argument_builder().debug_assert();
    }
}
