use life_compass_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("life-compass: {err}");
        std::process::exit(1);
    }
}
