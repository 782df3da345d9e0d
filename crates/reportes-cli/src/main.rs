#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use reportes_core::config;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "reportes: facility-maintenance ticket tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format: pretty, text or json.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and user config.
    fn output_mode(&self) -> OutputMode {
        let user = config::load_user_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable user config");
            config::UserConfig::default()
        });
        resolve_output_mode(self.format, self.json, user.output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a reportes project",
        long_about = "Create .reportes/ with a default config, the ticket store and an empty office directory.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    rp init\n\n    # Rewrite the config, keeping existing tickets\n    rp init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "File a new ticket",
        long_about = "Create a maintenance ticket. Resolved tickets need --resolved-by.",
        after_help = "EXAMPLES:\n    # Report a problem\n    rp create --floor 2 --office Legal --reporter Ana --reason \"No network\"\n\n    # Record work already done\n    rp create --floor -1 --office Archivo --reporter Ana --reason Leak \\\n        --status resolved --resolved-by \"Tomas, Nahuel\" --date 05/03/24"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets",
        long_about = "List tickets newest first with optional filters and paging.",
        after_help = "EXAMPLES:\n    # Pending tickets\n    rp list --status pending\n\n    # Second page of floor 3\n    rp list --floor 3 --page 2\n\n    # Everything, machine-readable\n    rp list --limit 0 --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Show one ticket",
        long_about = "Show a ticket and its comments, newest comment first.",
        after_help = "EXAMPLES:\n    rp show 42\n    rp show 42 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Edit a ticket",
        long_about = "Edit ticket fields and/or move it to another status. Moving away from resolved clears the resolvers.",
        after_help = "EXAMPLES:\n    # Start work\n    rp update 42 --status in_progress\n\n    # Resolve on a given date\n    rp update 42 --status resolved --by Chloe --date 2024-03-05"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Mark a ticket resolved",
        long_about = "Quick resolve. Every listed technician gets full credit.",
        after_help = "EXAMPLES:\n    rp resolve 42 --by \"Tomas, Nahuel\"\n    rp resolve 42 --by Chloe --date 05/03/24"
    )]
    Resolve(cmd::resolve::ResolveArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Comment on a ticket",
        after_help = "EXAMPLES:\n    rp comment 42 \"Waiting for parts\" --author Adrian"
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Delete a ticket",
        long_about = "Delete a ticket and its comments. The id is never reused.",
        after_help = "EXAMPLES:\n    rp delete 42 --force"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Statistics",
        about = "Statistics dashboard",
        long_about = "Totals, status breakdown, rankings, monthly and daily trends, averages and employee of the month.",
        after_help = "EXAMPLES:\n    rp stats\n    rp stats --top 10 --locale es\n    rp stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Statistics",
        about = "Monthly trend for charts",
        long_about = "The last twelve months, oldest first, with Total/Resolved/Pending/In progress series.",
        after_help = "EXAMPLES:\n    rp trend\n    rp trend --json > trend.json"
    )]
    Trend(cmd::trend::TrendArgs),

    #[command(
        next_help_heading = "Statistics",
        about = "Fixed text reports",
        after_help = "EXAMPLES:\n    rp report\n    rp report pending\n    rp report week"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Maintain the office directory",
        after_help = "EXAMPLES:\n    rp offices list\n    rp offices add Legal --floor 2\n    rp offices floors"
    )]
    Offices(cmd::offices::OfficesArgs),

    #[command(
        next_help_heading = "Data",
        about = "Export tickets as JSONL",
        after_help = "EXAMPLES:\n    rp export > tickets.jsonl\n    rp export --output backup.jsonl --no-comments"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Data",
        about = "Import a legacy store",
        long_about = "Copy tickets, comments and offices from a legacy database, keeping ticket ids.",
        after_help = "EXAMPLES:\n    rp import /srv/old/reportes.db"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Data",
        about = "Show store locations and counts"
    )]
    Info(cmd::info::InfoArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    rp completions bash > ~/.local/share/bash-completion/completions/rp"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("REPORTES_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "reportes=debug,info"
        } else {
            "reportes=info,warn"
        })
    });

    let format = env::var("REPORTES_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Update(ref args) => cmd::update::run_update(args, output, &project_root),
        Commands::Resolve(ref args) => cmd::resolve::run_resolve(args, output, &project_root),
        Commands::Comment(ref args) => cmd::comment::run_comment(args, output, &project_root),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, output, &project_root),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &project_root),
        Commands::Trend(ref args) => cmd::trend::run_trend(args, output, &project_root),
        Commands::Report(ref args) => cmd::report::run_report(args, output, &project_root),
        Commands::Offices(ref args) => cmd::offices::run_offices(args, output, &project_root),
        Commands::Export(ref args) => cmd::export::run_export(args, output, &project_root),
        Commands::Import(ref args) => cmd::import::run_import(args, output, &project_root),
        Commands::Info(ref args) => cmd::info::run_info(args, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}
