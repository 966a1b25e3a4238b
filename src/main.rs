use clap::{Parser, Subcommand};

mod cmd;

use cmd::{
    calculate::CalculateCommand, compare::CompareCommand, rules::RulesCommand,
    schema::SchemaCommand,
};

#[derive(Parser, Debug)]
#[command(name = "taxregime", version, author)]
#[command(about = "Compare small business tax regimes and project liability over four years")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the selected regime and recommend the cheapest one
    Calculate(CalculateCommand),
    /// Compare every regime for one projected year
    Compare(CompareCommand),
    /// Print the JSON Schema of a calculation request
    Schema(SchemaCommand),
    /// Print the default tax rules, a template for --rules
    Rules(RulesCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Compare(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
        Command::Rules(cmd) => cmd.exec(),
    }
}
