// region:    --- Imports
use crate::auction::service::{AuctionService, StartAuctionCommand};
use crate::bidding::commands::{self, PlaceBidCommand};
use crate::clock::Clock;
use crate::error::DomainError;
use crate::repository::AuctionRepository;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

/// 핸들러 공유 상태(수명주기 서비스, 저장소, 시계)
pub type ServiceState = (
    Arc<AuctionService>,
    Arc<dyn AuctionRepository>,
    Arc<dyn Clock>,
);

// region:    --- Command Handlers

/// 경매 시작 요청 처리(관리자)
pub async fn handle_start_auction(
    State((auction_service, _, _)): State<ServiceState>,
    Path(item_id): Path<i64>,
    body: Option<Json<StartAuctionCommand>>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 시작 요청 item_id: {}", "Handler", item_id);

    let cmd = body.map(|Json(cmd)| cmd).unwrap_or_default();
    match auction_service.start_auction(item_id, cmd).await {
        Ok(auction) => Json(serde_json::json!({ "auction": auction })).into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

/// 경매 강제 종료 요청 처리(관리자)
pub async fn handle_end_auction(
    State((auction_service, _, _)): State<ServiceState>,
    Path(item_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 종료 요청 item_id: {}", "Handler", item_id);

    match auction_service.end_auction(item_id).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State((_, repo, clock)): State<ServiceState>,
    Path(auction_id): Path<i64>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 입찰 요청 auction_id: {}, bidder_id: {}",
        "Handler", auction_id, cmd.bidder_id
    );

    match commands::handle_place_bid(auction_id, cmd, &*repo, &*clock).await {
        Ok(bid) => Json(serde_json::json!({ "bid": bid })).into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_list_auctions(
    State((auction_service, _, _)): State<ServiceState>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 목록 조회", "Handler");

    match auction_service.list_auctions().await {
        Ok(auctions) => Json(serde_json::json!({ "auctions": auctions })).into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

/// 경매 상세 조회
pub async fn handle_get_auction_detail(
    State((auction_service, _, _)): State<ServiceState>,
    Path(item_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 상세 조회 item_id: {}", "Handler", item_id);

    match auction_service.get_auction_detail(item_id).await {
        Ok(detail) => Json(serde_json::json!({ "auction": detail })).into_response(),
        Err(e @ DomainError::AuctionNotFound) => {
            (StatusCode::NOT_FOUND, Json(e.to_json())).into_response()
        }
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State((auction_service, _, _)): State<ServiceState>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 입찰 이력 조회 auction_id: {}",
        "Handler", auction_id
    );

    match auction_service.bid_history(auction_id).await {
        Ok(history) => Json(serde_json::json!({ "history": history })).into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

// endregion: --- Query Handlers
