/// 경매 저장소
/// 영속 상태의 유일한 기록 경로, 입찰 커밋은 단일 트랜잭션에서 원자적으로 처리한다
// region:    --- Imports
use crate::auction::model::{Auction, AuctionDetail, AuctionStatus, AuctionSummary, Item, NewAuction};
use crate::bidding::model::{Bid, NewBid};
use crate::error::DomainError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

pub mod queries;
// endregion: --- Imports

// region:    --- Repository Trait

/// 경매 저장소 트레이트
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    async fn find_item(&self, item_id: i64) -> Result<Option<Item>, DomainError>;

    /// 상품 기준 경매 조회(상품, 최고 입찰, 입찰 이력 동반 로드)
    async fn find_auction_by_item(&self, item_id: i64)
        -> Result<Option<AuctionDetail>, DomainError>;

    /// 경매 id 기준 조회(상품, 최고 입찰, 입찰 이력 동반 로드)
    async fn find_auction_by_id(&self, auction_id: i64)
        -> Result<Option<AuctionDetail>, DomainError>;

    /// 모든 경매 조회(상품, 최고 입찰 동반 로드)
    async fn list_auctions(&self) -> Result<Vec<AuctionSummary>, DomainError>;

    async fn create_auction(&self, new_auction: NewAuction) -> Result<Auction, DomainError>;

    /// 상태 무조건 변경(강제 종료)
    async fn update_auction_status(
        &self,
        auction_id: i64,
        status: AuctionStatus,
    ) -> Result<Auction, DomainError>;

    /// 지연 만료 반영, RUNNING 이 아니면 None(이미 다른 요청이 기록함)
    async fn expire_auction(&self, auction_id: i64) -> Result<Option<Auction>, DomainError>;

    /// 입찰 커밋: 입찰 행 추가와 (highest_bid_id, current_price) 갱신을
    /// 한 트랜잭션에서 수행한다. 읽었던 가격이 이미 갱신되었으면
    /// 전체를 롤백하고 CommitConflict 를 반환한다.
    async fn commit_bid(
        &self,
        new_bid: NewBid,
        expected_price: Decimal,
    ) -> Result<Bid, DomainError>;

    /// 입찰 이력 조회(최신순)
    async fn bid_history(&self, auction_id: i64) -> Result<Vec<Bid>, DomainError>;
}

// endregion: --- Repository Trait

// region:    --- Postgres Repository

/// 경매 저장소 구현체
pub struct PostgresAuctionRepository {
    pool: Arc<PgPool>,
}

impl PostgresAuctionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// 경매 행에 상품/최고 입찰/입찰 이력을 붙여 상세 뷰 구성
    async fn load_detail(&self, auction: Auction) -> Result<AuctionDetail, DomainError> {
        let item = sqlx::query_as::<_, Item>(queries::FIND_ITEM)
            .bind(auction.item_id)
            .fetch_one(&*self.pool)
            .await?;

        let highest_bid = match auction.highest_bid_id {
            Some(bid_id) => {
                sqlx::query_as::<_, Bid>(queries::FIND_BID)
                    .bind(bid_id)
                    .fetch_optional(&*self.pool)
                    .await?
            }
            None => None,
        };

        let bids = sqlx::query_as::<_, Bid>(queries::BID_HISTORY)
            .bind(auction.id)
            .fetch_all(&*self.pool)
            .await?;

        Ok(AuctionDetail {
            auction,
            item,
            highest_bid,
            bids,
        })
    }
}

#[async_trait]
impl AuctionRepository for PostgresAuctionRepository {
    async fn find_item(&self, item_id: i64) -> Result<Option<Item>, DomainError> {
        let item = sqlx::query_as::<_, Item>(queries::FIND_ITEM)
            .bind(item_id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(item)
    }

    async fn find_auction_by_item(
        &self,
        item_id: i64,
    ) -> Result<Option<AuctionDetail>, DomainError> {
        let auction = sqlx::query_as::<_, Auction>(queries::FIND_AUCTION_BY_ITEM)
            .bind(item_id)
            .fetch_optional(&*self.pool)
            .await?;

        match auction {
            Some(auction) => Ok(Some(self.load_detail(auction).await?)),
            None => Ok(None),
        }
    }

    async fn find_auction_by_id(
        &self,
        auction_id: i64,
    ) -> Result<Option<AuctionDetail>, DomainError> {
        let auction = sqlx::query_as::<_, Auction>(queries::FIND_AUCTION_BY_ID)
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await?;

        match auction {
            Some(auction) => Ok(Some(self.load_detail(auction).await?)),
            None => Ok(None),
        }
    }

    async fn list_auctions(&self) -> Result<Vec<AuctionSummary>, DomainError> {
        let auctions = sqlx::query_as::<_, Auction>(queries::LIST_AUCTIONS)
            .fetch_all(&*self.pool)
            .await?;

        let mut summaries = Vec::with_capacity(auctions.len());
        for auction in auctions {
            let item = sqlx::query_as::<_, Item>(queries::FIND_ITEM)
                .bind(auction.item_id)
                .fetch_one(&*self.pool)
                .await?;

            let highest_bid = match auction.highest_bid_id {
                Some(bid_id) => {
                    sqlx::query_as::<_, Bid>(queries::FIND_BID)
                        .bind(bid_id)
                        .fetch_optional(&*self.pool)
                        .await?
                }
                None => None,
            };

            summaries.push(AuctionSummary {
                auction,
                item,
                highest_bid,
            });
        }

        Ok(summaries)
    }

    async fn create_auction(&self, new_auction: NewAuction) -> Result<Auction, DomainError> {
        let auction = sqlx::query_as::<_, Auction>(queries::CREATE_AUCTION)
            .bind(new_auction.item_id)
            .bind(AuctionStatus::Running.as_str())
            .bind(new_auction.start_time)
            .bind(new_auction.end_time)
            .bind(new_auction.current_price)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| match &e {
                // item_id UNIQUE 제약: 동시 시작 요청도 한 건만 통과한다
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::AuctionAlreadyExists
                }
                _ => DomainError::Database(e),
            })?;
        Ok(auction)
    }

    async fn update_auction_status(
        &self,
        auction_id: i64,
        status: AuctionStatus,
    ) -> Result<Auction, DomainError> {
        let auction = sqlx::query_as::<_, Auction>(queries::UPDATE_AUCTION_STATUS)
            .bind(auction_id)
            .bind(status.as_str())
            .fetch_one(&*self.pool)
            .await?;
        Ok(auction)
    }

    async fn expire_auction(&self, auction_id: i64) -> Result<Option<Auction>, DomainError> {
        let auction = sqlx::query_as::<_, Auction>(queries::EXPIRE_AUCTION)
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await?;
        if auction.is_some() {
            info!("{:<12} --> 만료 경매 종료 기록 id: {}", "Repository", auction_id);
        }
        Ok(auction)
    }

    async fn commit_bid(
        &self,
        new_bid: NewBid,
        expected_price: Decimal,
    ) -> Result<Bid, DomainError> {
        let mut tx = self.pool.begin().await?;

        let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
            .bind(new_bid.auction_id)
            .bind(new_bid.user_id)
            .bind(new_bid.amount)
            .bind(new_bid.created_at)
            .fetch_one(&mut *tx)
            .await?;

        // 검증 당시의 가격이 그대로일 때만 낙찰 포인터가 갱신된다
        let settled = sqlx::query(queries::SETTLE_BID)
            .bind(new_bid.auction_id)
            .bind(bid.id)
            .bind(bid.amount)
            .bind(expected_price)
            .execute(&mut *tx)
            .await?;

        if settled.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DomainError::CommitConflict);
        }

        tx.commit().await?;
        Ok(bid)
    }

    async fn bid_history(&self, auction_id: i64) -> Result<Vec<Bid>, DomainError> {
        let bids = sqlx::query_as::<_, Bid>(queries::BID_HISTORY)
            .bind(auction_id)
            .fetch_all(&*self.pool)
            .await?;
        Ok(bids)
    }
}

// endregion: --- Postgres Repository
