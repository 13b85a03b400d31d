use clap::Parser;
use redcrawl::cli::{Config, Runner, die};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    let runner = match Runner::connect(config).await {
        Ok(runner) => runner,
        Err(err) => die(1, &err.help()),
    };

    match runner.run().await {
        Ok(output) => println!("{output}"),
        Err(err) => die(1, &err.help()),
    }
}
