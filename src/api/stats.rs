use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::Target;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let config = bc.config();

    // last interval
    let last_interval_secs = match bc.blocks() {
        [.., older, newer] => Some((newer.timestamp() - older.timestamp()).max(0)),
        _ => None,
    };

    // config was validated when the chain was built
    let target = Target::from_difficulty_bits(config.difficulty_bits)
        .map(|t| t.to_string())
        .unwrap_or_default();

    HttpResponse::Ok().json(StatsResponse {
        height: bc.len(),
        difficulty_bits: config.difficulty_bits,
        target,
        max_nonce: config.max_nonce,
        workers: bc.strategy().workers(),
        last_interval_secs,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::api::models::{AppState, StatsResponse};
    use crate::blockchain::Blockchain;
    use crate::config::{MiningStrategy, PowConfig};

    #[actix_web::test]
    async fn reports_chain_parameters() {
        let bc = Blockchain::new(
            "stats",
            PowConfig::new(8),
            MiningStrategy::Parallel { workers: 2 },
        )
        .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(bc)))
                .service(super::get_stats),
        )
        .await;

        let req = test::TestRequest::get().uri("/stats/").to_request();
        let stats: StatsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.height, 1);
        assert_eq!(stats.difficulty_bits, 8);
        assert_eq!(stats.workers, 2);
        assert!(stats.target.starts_with("01"));
        assert_eq!(stats.last_interval_secs, None);
    }
}
