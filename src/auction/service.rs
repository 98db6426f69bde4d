/// 경매 수명주기 서비스
/// 1. 경매 시작(관리자)
/// 2. 경매 강제 종료(관리자)
/// 3. 경매 상세/목록 조회
// region:    --- Imports
use crate::auction::model::{
    Auction, AuctionDetail, AuctionStatus, AuctionSummary, ForceEndResult, NewAuction,
};
use crate::auction::state;
use crate::bidding::model::Bid;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::repository::AuctionRepository;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Commands

/// 기본 경매 시간(분)
pub const DEFAULT_AUCTION_MINUTES: u32 = 30;

/// 경매 시작 명령
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StartAuctionCommand {
    pub duration_minutes: Option<u32>,
}

// endregion: --- Commands

// region:    --- Auto Expiry

/// 지연 만료 평가
/// 종료 시각이 지난 RUNNING 경매를 ENDED 로 기록하고 갱신된 행을 돌려준다.
/// 조회/입찰 경로가 모두 이 함수를 먼저 거치므로 외부에서는
/// 기한이 지난 RUNNING 경매를 관찰할 수 없다.
pub async fn auto_end_if_needed(
    repo: &dyn AuctionRepository,
    auction: Auction,
    now: DateTime<Utc>,
) -> Result<Auction, DomainError> {
    if !state::expiry_due(&auction, now) {
        return Ok(auction);
    }

    match repo.expire_auction(auction.id).await? {
        Some(updated) => Ok(updated),
        // 다른 요청이 먼저 만료를 기록한 경우
        None => Ok(Auction {
            status: AuctionStatus::Ended,
            ..auction
        }),
    }
}

// endregion: --- Auto Expiry

// region:    --- Auction Service

/// 경매 수명주기 서비스
/// 저장소와 시계를 주입받아 프로세스당 한 번 생성된다
pub struct AuctionService {
    repo: Arc<dyn AuctionRepository>,
    clock: Arc<dyn Clock>,
}

impl AuctionService {
    pub fn new(repo: Arc<dyn AuctionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// 경매 시작
    /// 상품의 기본 가격을 시작가로 하여 즉시 RUNNING 상태로 생성한다
    pub async fn start_auction(
        &self,
        item_id: i64,
        cmd: StartAuctionCommand,
    ) -> Result<Auction, DomainError> {
        info!("{:<12} --> 경매 시작 요청 item_id: {}", "Lifecycle", item_id);

        let item = self
            .repo
            .find_item(item_id)
            .await?
            .ok_or(DomainError::ItemNotFound)?;

        // 상품당 경매는 하나만 허용
        if self.repo.find_auction_by_item(item_id).await?.is_some() {
            return Err(DomainError::AuctionAlreadyExists);
        }

        // 0 이하 값은 기본값으로 대체
        let minutes = cmd
            .duration_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_AUCTION_MINUTES);

        let now = self.clock.now();
        let auction = self
            .repo
            .create_auction(NewAuction {
                item_id,
                start_time: now,
                end_time: now + Duration::minutes(i64::from(minutes)),
                current_price: item.base_price,
            })
            .await?;

        info!(
            "{:<12} --> 경매 시작 id: {}, 종료 시각: {}",
            "Lifecycle", auction.id, auction.end_time
        );
        Ok(auction)
    }

    /// 경매 강제 종료
    /// 종료 시각 이전에도 호출 가능하며, 호출 시점의 최고 입찰을 낙찰자로 보고한다.
    /// 이미 종료된 경매에 다시 호출해도 같은 낙찰자를 재보고한다.
    pub async fn end_auction(&self, item_id: i64) -> Result<ForceEndResult, DomainError> {
        info!("{:<12} --> 경매 종료 요청 item_id: {}", "Lifecycle", item_id);

        let detail = self
            .repo
            .find_auction_by_item(item_id)
            .await?
            .ok_or(DomainError::AuctionNotFound)?;

        let winner = detail.highest_bid.clone();
        let auction = self
            .repo
            .update_auction_status(detail.auction.id, AuctionStatus::Ended)
            .await?;

        info!(
            "{:<12} --> 경매 종료 id: {}, 낙찰자: {:?}",
            "Lifecycle",
            auction.id,
            winner.as_ref().map(|b| b.user_id)
        );
        Ok(ForceEndResult {
            message: "경매가 종료되었습니다.".to_string(),
            winner,
            auction,
        })
    }

    /// 경매 상세 조회(만료 평가 포함)
    pub async fn get_auction_detail(&self, item_id: i64) -> Result<AuctionDetail, DomainError> {
        info!("{:<12} --> 경매 상세 조회 item_id: {}", "Lifecycle", item_id);

        let mut detail = self
            .repo
            .find_auction_by_item(item_id)
            .await?
            .ok_or(DomainError::AuctionNotFound)?;

        detail.auction = auto_end_if_needed(&*self.repo, detail.auction, self.clock.now()).await?;
        Ok(detail)
    }

    /// 모든 경매 조회
    /// 반환 전 각 경매에 만료 평가를 적용하므로 목록은 기한에 대해 항상 최신이다
    pub async fn list_auctions(&self) -> Result<Vec<AuctionSummary>, DomainError> {
        info!("{:<12} --> 경매 목록 조회", "Lifecycle");

        let summaries = self.repo.list_auctions().await?;
        let now = self.clock.now();

        let mut evaluated = Vec::with_capacity(summaries.len());
        for mut summary in summaries {
            summary.auction = auto_end_if_needed(&*self.repo, summary.auction, now).await?;
            evaluated.push(summary);
        }
        Ok(evaluated)
    }

    /// 입찰 이력 조회(최신순)
    pub async fn bid_history(&self, auction_id: i64) -> Result<Vec<Bid>, DomainError> {
        info!(
            "{:<12} --> 입찰 이력 조회 auction_id: {}",
            "Lifecycle", auction_id
        );
        self.repo.bid_history(auction_id).await
    }
}

// endregion: --- Auction Service
