#[tokio::main]
async fn main() {
    if let Err(e) = pantrydesk_lib::run().await {
        eprintln!("pantrydesk: {e}");
        std::process::exit(1);
    }
}
