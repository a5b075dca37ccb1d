// ankiform - send text to a question generator, render what comes back

use ankiform::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
