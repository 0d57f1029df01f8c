use super::args::*;

pub mod generate;
pub mod import;
pub mod upload;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Import(args) => import::run(args).await,
        Command::Upload(args) => upload::run(args).await,
        Command::Generate(args) => generate::run(args).await,
    }
}

pub(crate) fn print_header(text: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", text);
    println!("{}", "=".repeat(60));
}
