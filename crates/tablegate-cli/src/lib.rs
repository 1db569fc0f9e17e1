mod cli;
mod config;
mod date;
mod input;
mod output;
mod query;
mod suggest;
mod validate;
mod write;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Date(args) => date::run(args),
        cli::Command::Query(args) => query::run(args),
        cli::Command::Write(args) => write::run(args),
        cli::Command::Validate(args) => validate::run(args),
        cli::Command::Suggest(args) => suggest::run(args),
    }
}
