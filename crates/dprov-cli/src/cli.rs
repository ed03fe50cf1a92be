use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dprov",
    about = "Fetch remote data and keep it in local storage",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = "dprov.toml")]
    pub config: PathBuf,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a URL
    Get(GetArgs),
    /// Store a local file under a key
    Put(PutArgs),
    /// Print the payload stored under a key
    Cat(KeyArgs),
    /// Show attributes of a stored entry
    Stat(KeyArgs),
    /// Delete a stored entry
    Rm(KeyArgs),
    /// Check whether a key is stored
    Exists(KeyArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub url: String,
    /// Store the response body under this key
    #[arg(long)]
    pub save: Option<String>,
    /// Extra request header, as `name: value`
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    pub file: PathBuf,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_get_with_save_and_headers() {
        let cli = Cli::parse_from([
            "dprov",
            "get",
            "https://example.com/feed?x=1",
            "--save",
            "feed.json",
            "-H",
            "accept: application/json",
        ]);
        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.url, "https://example.com/feed?x=1");
                assert_eq!(args.save.as_deref(), Some("feed.json"));
                assert_eq!(args.headers, vec!["accept: application/json".to_string()]);
            }
            _ => panic!("expected get"),
        }
        assert_eq!(cli.config, PathBuf::from("dprov.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dprov", "stat", "k", "-v", "--format", "json", "-c", "x.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }
}
