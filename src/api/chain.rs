use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{AddBlockRequest, AppState, BlockResponse, ChainResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: bc.len(),
        difficulty_bits: bc.config().difficulty_bits,
        chain: bc
            .blocks()
            .iter()
            .enumerate()
            .map(|(i, b)| BlockResponse::from_block(i, b))
            .collect(),
    };
    HttpResponse::Ok().json(resp)
}

/// Get a single block by height.
#[get("/blocks/{index}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<usize>) -> impl Responder {
    let index = path.into_inner();
    let bc = state.blockchain.lock().expect("mutex poisoned");
    match bc.get(index) {
        Some(block) => HttpResponse::Ok().json(BlockResponse::from_block(index, block)),
        None => HttpResponse::NotFound().body(format!("no block at height {index}")),
    }
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let valid = bc.is_valid_chain();
    if !valid {
        warn!("chain failed validation at length {}", bc.len());
    }
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: bc.len(),
        difficulty_bits: bc.config().difficulty_bits,
    })
}

/// Mine a block carrying `data` and append it to the chain.
///
/// Mining runs on the blocking pool while holding the chain lock, so
/// appends are serialized.
#[post("/blocks/")]
pub async fn add_block(
    state: web::Data<AppState>,
    req: web::Json<AddBlockRequest>,
) -> impl Responder {
    let data = req.into_inner().data;

    let mined = web::block(move || {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let index = bc.len();
        bc.add_block(data)
            .map(|block| BlockResponse::from_block(index, block))
    })
    .await;

    match mined {
        Ok(Ok(resp)) => {
            info!(
                "API - sealed block #{} (hash={}, nonce={})",
                resp.index, resp.hash, resp.nonce
            );
            HttpResponse::Created().json(resp)
        }
        Ok(Err(e)) => {
            error!("API - mining failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
        Err(e) => {
            error!("API - mining task did not complete: {e}");
            HttpResponse::InternalServerError().body("mining task did not complete")
        }
    }
}
