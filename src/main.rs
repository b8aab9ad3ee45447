use clap::Parser;
use inwall::cli::{logging, Cli, Commands};
use inwall::core::Config;
use miette::Result;

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
    let config = Config::load();
    logging::init_logging(&global, &config)?;

    match cli.command {
        Commands::Encode(args) => inwall::cli::commands::encode::run(args, &global, &config),
        Commands::Decode(args) => inwall::cli::commands::decode::run(args, &global, &config),
        Commands::Bom(args) => inwall::cli::commands::bom::run(args, &global, &config),
        Commands::Legend(args) => inwall::cli::commands::legend::run(args, &global, &config),
        Commands::Template => inwall::cli::commands::template::run(&config),
        Commands::Completions(args) => inwall::cli::commands::completions::run(args),
    }
}
