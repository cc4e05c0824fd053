use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cmdwiki::config::{self, Config, RepoId};
use cmdwiki::search::{self, SearchOutcome};
use cmdwiki::{script, tui, Command, GitSync, IndexBuilder, LocalCheckout, RepoSync};

#[derive(Parser, Debug)]
#[command(name = "cwc")]
#[command(author, version, about = "Search command recipes, fill in their placeholders, run them")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,

    /// Search terms (no terms: browse every command)
    query: Vec<String>,

    /// Repository to use instead of the configured one
    #[arg(long, global = true)]
    repo: Option<String>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Search the index and run the chosen command
    #[command(alias = "s")]
    Search {
        /// Search terms
        query: Vec<String>,

        /// Print ranked matches instead of opening the picker
        #[arg(short, long)]
        list: bool,
    },

    /// Sync the repository and rebuild the index
    #[command(alias = "update-index")]
    Update {
        /// Branch to build from (default: the tracked branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Index an existing checkout instead of syncing with git
        #[arg(long, value_name = "DIR")]
        local: Option<PathBuf>,
    },

    /// Add the commands of a generated markdown document to the index
    Add {
        /// Markdown file, or - for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Remove every mirror, index and saved document
    Clean,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cmdwiki={0},cwc={0}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> cmdwiki::Result<()> {
    if let Some(Cmd::Completion { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "cwc", &mut io::stdout());
        return Ok(());
    }

    let home = config::home_dir()?;
    if let Some(Cmd::Clean) = cli.command {
        config::clean(&home)?;
        println!("{} {}", "Removed".green(), home.display());
        return Ok(());
    }

    let config = Config::load(&home)?;
    let url = cli.repo.clone().unwrap_or_else(|| config.repo.clone());
    let repo = RepoId::from_url(&url)?;
    let builder = IndexBuilder::new(&home, &config, &repo);

    match cli.command {
        Some(Cmd::Update { branch, local }) => {
            let branch = match branch {
                Some(b) => b,
                None => builder.tracked_branch()?,
            };
            let sync: Box<dyn RepoSync> = match local {
                Some(dir) => Box::new(LocalCheckout::new(dir)),
                None => Box::new(GitSync::new(config::repo_dir(&home, &repo))),
            };
            let report = builder.rebuild(sync.as_ref(), &url, &branch)?;
            println!(
                "{} {} commands from {} documents ({} @ {})",
                "Indexed".green(),
                report.commands,
                report.documents,
                repo,
                report.branch
            );
            Ok(())
        }
        Some(Cmd::Add { file }) => {
            let markdown = read_document(&file)?;
            let added = builder.merge_document(&markdown)?;
            if added.is_empty() {
                println!("{}", "No commands found in document".yellow());
            }
            for cmd in &added {
                println!("   {} {}", "Added".green(), cmd.title);
            }
            Ok(())
        }
        Some(Cmd::Search { query, list }) => search(&builder, &config, &home, &repo, &url, &query, list),
        None => search(&builder, &config, &home, &repo, &url, &cli.query, false),
        Some(Cmd::Clean) | Some(Cmd::Completion { .. }) => Ok(()),
    }
}

fn search(
    builder: &IndexBuilder,
    config: &Config,
    home: &Path,
    repo: &RepoId,
    url: &str,
    query: &[String],
    list: bool,
) -> cmdwiki::Result<()> {
    let sync = GitSync::new(config::repo_dir(home, repo));
    let now = chrono::Utc::now().timestamp_millis();
    let commands = builder.load_for_search(&sync, url, now)?;

    let query = query.join(" ");
    let ranked = search::rank(&query, &commands);

    if list {
        if ranked.is_empty() {
            println!("No commands found");
        }
        for r in &ranked {
            if r.command.ai_generated {
                println!("{:>7.4}  {} {}", r.score, r.command.title, "[ai]".magenta());
            } else {
                println!("{:>7.4}  {}", r.score, r.command.title);
            }
        }
        return Ok(());
    }

    match SearchOutcome::from_ranked(ranked) {
        SearchOutcome::NoMatches => {
            println!("No commands found");
            Ok(())
        }
        SearchOutcome::Single(cmd) => run_command(cmd, config),
        SearchOutcome::Many(ranked) => match tui::pick(&ranked)? {
            Some(index) => run_command(ranked[index].command, config),
            None => Ok(()),
        },
    }
}

fn run_command(cmd: &Command, config: &Config) -> cmdwiki::Result<()> {
    let Some(values) = tui::resolve(cmd)? else {
        return Ok(());
    };

    let rendered = script::render(&cmd.content, &values);
    println!("{}", "Running command:".green().bold());
    println!("{}", rendered.trim_end());

    let status = script::execute(&rendered, &config.shell)?;
    info!(title = %cmd.title, %status, "command finished");
    Ok(())
}

fn read_document(file: &Path) -> cmdwiki::Result<String> {
    if file == Path::new("-") {
        let mut markdown = String::new();
        io::stdin()
            .read_to_string(&mut markdown)
            .map_err(|e| cmdwiki::Error::io(file, e))?;
        Ok(markdown)
    } else {
        std::fs::read_to_string(file).map_err(|e| cmdwiki::Error::io(file, e))
    }
}
