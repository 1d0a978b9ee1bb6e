use std::net::TcpListener;

use env_logger::Env;
use prospect::{
    configuration::get_configuration,
    services::{ExtractionCache, OpenaiClient},
    startup::run,
};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    let openai_client = OpenaiClient::new(configuration.api_keys.openai.clone());
    let extraction_cache = Mutex::new(ExtractionCache::default());

    run(listener, configuration, openai_client, extraction_cache)?.await
}
