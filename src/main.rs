use clap::Parser;
use miette::Result;
use sbench::cli::{Cli, Commands};
use sbench::core::logging;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Init(args) => sbench::cli::commands::init::run(args, &global),
        Commands::Project(cmd) => sbench::cli::commands::project::run(cmd, &global),
        Commands::Ingest(args) => sbench::cli::commands::ingest::run(args, &global),
        Commands::Extract(args) => sbench::cli::commands::extract::run(args, &global),
        Commands::Doc(cmd) => sbench::cli::commands::doc::run(cmd, &global),
        Commands::Framework(cmd) => sbench::cli::commands::framework::run(cmd, &global),
        Commands::Analyze(args) => sbench::cli::commands::analyze::run(args, &global),
        Commands::Report(cmd) => sbench::cli::commands::report::run(cmd, &global),
        Commands::Config(cmd) => sbench::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => sbench::cli::commands::completions::run(args),
    }
}
