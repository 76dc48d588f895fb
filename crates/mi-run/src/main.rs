use clap::Parser;

fn main() -> miette::Result<()> {
    mi_run::Cli::parse().run()
}
