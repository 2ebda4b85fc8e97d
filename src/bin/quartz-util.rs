use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), ()> {
    use quartz_auth::util::cli::*;

    dotenv::dotenv().ok();
    init_tracing();

    let opts = UtilOptions::parse();
    run_cli_action(opts).await
}
