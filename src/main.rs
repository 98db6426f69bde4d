// region:    --- Imports
use crate::auction::service::AuctionService;
use crate::clock::{Clock, SystemClock};
use crate::database::DatabaseManager;
use crate::repository::{AuctionRepository, PostgresAuctionRepository};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod bidding;
mod clock;
mod database;
mod error;
mod handlers;
mod repository;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 저장소, 시계, 수명주기 서비스는 프로세스당 한 번 생성해 명시적으로 주입한다
    let repo: Arc<dyn AuctionRepository> =
        Arc::new(PostgresAuctionRepository::new(db_manager.get_pool()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let auction_service = Arc::new(AuctionService::new(Arc::clone(&repo), Arc::clone(&clock)));

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/auctions", get(handlers::handle_list_auctions))
        .route("/auctions/:item_id", get(handlers::handle_get_auction_detail))
        .route("/auctions/:item_id/start", post(handlers::handle_start_auction))
        .route("/auctions/:item_id/end", post(handlers::handle_end_auction))
        .route("/bids/:auction_id", post(handlers::handle_place_bid))
        .route("/bids/:auction_id/history", get(handlers::handle_get_bid_history))
        .layer(cors)
        .with_state((auction_service, repo, clock));

    // 리스너 생성(로컬 호스트의 3000번 포트를 사용)
    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr().unwrap()
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
