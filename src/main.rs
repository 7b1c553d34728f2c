use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use pow_ledger::api::{self, AppState};
use pow_ledger::{Blockchain, NodeConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env().map_err(std::io::Error::other)?;
    info!(
        "Mining genesis block (bits={}, strategy={:?})",
        config.pow.difficulty_bits, config.strategy
    );

    let blockchain = Blockchain::new(&config.genesis_message, config.pow, config.strategy)
        .map_err(std::io::Error::other)?;
    info!("Genesis block:\n{}", blockchain.last_block());

    println!(
        "⛓️ Starting ledger API at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(blockchain));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
