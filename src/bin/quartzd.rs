use clap::Parser;

#[tokio::main]
async fn main() {
    use quartz_auth::util::cli::*;

    dotenv::dotenv().ok();
    init_tracing();

    let opts = ServerOptions::parse();
    run_server(opts).await;
}
