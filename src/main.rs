use colored::Colorize;

#[tokio::main]
async fn main() {
    if let Err(err) = alphaquery::run().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
