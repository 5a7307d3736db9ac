#[tokio::main]
async fn main() {
    if let Err(err) = stagedoor_bot::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
