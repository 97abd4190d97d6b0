mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, layout, positions, watch};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.to_config();

    logging::init_logging(cfg.quiet);
    print::banner(commands.no_banner, cfg.quiet);

    let result = match commands.command {
        Commands::Info => {
            print::section("about the tool", None, cfg.quiet);
            info::info(&cfg)
        }
        Commands::Watch {
            snapshot,
            scans,
            remember,
            ..
        } => {
            print::section("watching topology", None, cfg.quiet);
            watch::watch(snapshot, scans, remember, &cfg).await
        }
        Commands::Layout { snapshot, save } => {
            print::section("laying out snapshot", None, cfg.quiet);
            layout::layout(&snapshot, save, &cfg)
        }
        Commands::Positions => positions::list(&cfg),
        Commands::Forget { name } => positions::forget(&name, &cfg),
    };

    print::closing_rule(cfg.quiet);
    result
}
