/// 입찰 정산 프로토콜
/// 검증과 커밋을 하나의 원자적 단위로 묶고,
/// 낙관적 충돌 시 갱신된 가격 기준으로 재검증한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Item};
use crate::auction::service::auto_end_if_needed;
use crate::auction::state;
use crate::bidding::model::{Bid, NewBid};
use crate::clock::Clock;
use crate::error::DomainError;
use crate::repository::AuctionRepository;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
/// 금액은 정밀도 손실을 막기 위해 십진수 문자열로 받는다
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub bidder_id: i64,
    pub amount: String,
}

// 최대 재시도 횟수
const MAX_RETRIES: i32 = 100;

/// 입찰 처리
pub async fn handle_place_bid(
    auction_id: i64,
    cmd: PlaceBidCommand,
    repo: &dyn AuctionRepository,
    clock: &dyn Clock,
) -> Result<Bid, DomainError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작 auction_id: {}, cmd: {:?}",
        "Command", auction_id, cmd
    );
    let mut retries = 0;

    while retries < MAX_RETRIES {
        // 경매, 상품, 최고 입찰을 함께 조회
        let detail = repo
            .find_auction_by_id(auction_id)
            .await?
            .ok_or(DomainError::AuctionNotFound)?;

        let now = clock.now();

        // 종료 시각이 지난 RUNNING 경매는 만료를 기록하고 거절
        if state::expiry_due(&detail.auction, now) {
            auto_end_if_needed(repo, detail.auction, now).await?;
            return Err(DomainError::AuctionExpired);
        }

        check_bid_window(&detail.auction, &detail.item, cmd.bidder_id, now)?;
        let amount = validate_amount(&cmd.amount, detail.auction.current_price)?;

        let new_bid = NewBid {
            auction_id,
            user_id: cmd.bidder_id,
            amount,
            created_at: now,
        };

        // 읽었던 가격을 기대값으로 원자적 커밋
        match repo.commit_bid(new_bid, detail.auction.current_price).await {
            Ok(bid) => {
                info!(
                    "{:<12} --> 입찰 성공 bid_id: {}, 금액: {}",
                    "Command", bid.id, bid.amount
                );
                return Ok(bid);
            }
            Err(DomainError::CommitConflict) => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 버전 충돌: 재시도",
                    "Command"
                );
                retries += 1;
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(DomainError::MaxRetriesExceeded)
}

/// 입찰 가능 상태 검증(순수 로직)
fn check_bid_window(
    auction: &Auction,
    item: &Item,
    bidder_id: i64,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if auction.status != AuctionStatus::Running {
        return Err(DomainError::AuctionNotRunning);
    }
    if now < auction.start_time {
        return Err(DomainError::AuctionNotStarted);
    }
    // 검증 도중 시간이 지난 경우
    if now >= auction.end_time {
        return Err(DomainError::AuctionExpired);
    }
    if bidder_id == item.admin_id {
        return Err(DomainError::SelfBidForbidden);
    }
    Ok(())
}

/// 금액 검증: 양의 십진수 파싱 후 현재 가격 초과 확인(동가는 거절)
fn validate_amount(raw: &str, current_price: Decimal) -> Result<Decimal, DomainError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidBidAmount)?;

    if amount <= Decimal::ZERO {
        return Err(DomainError::InvalidBidAmount);
    }
    if amount <= current_price {
        return Err(DomainError::BidTooLow { current_price });
    }
    Ok(amount)
}

// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn fixture() -> (Auction, Item, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let auction = Auction {
            id: 1,
            item_id: 1,
            status: AuctionStatus::Running,
            start_time: start,
            end_time: start + Duration::minutes(30),
            current_price: dec!(1500000.00),
            highest_bid_id: None,
            created_at: start,
        };
        let item = Item {
            id: 1,
            title: "골동품 화병".to_string(),
            description: String::new(),
            image_url: None,
            base_price: dec!(1500000.00),
            admin_id: 10,
            created_at: start,
        };
        (auction, item, start + Duration::minutes(5))
    }

    #[test]
    fn test_bid_on_running_auction_is_allowed() {
        let (auction, item, now) = fixture();
        assert!(check_bid_window(&auction, &item, 20, now).is_ok());
    }

    #[test]
    fn test_bid_on_non_running_auction_is_rejected() {
        let (mut auction, item, now) = fixture();
        for status in [
            AuctionStatus::Draft,
            AuctionStatus::Ended,
            AuctionStatus::Canceled,
        ] {
            auction.status = status;
            assert!(matches!(
                check_bid_window(&auction, &item, 20, now),
                Err(DomainError::AuctionNotRunning)
            ));
        }
    }

    #[test]
    fn test_bid_before_start_time_is_rejected() {
        let (auction, item, _) = fixture();
        let now = auction.start_time - Duration::seconds(1);
        assert!(matches!(
            check_bid_window(&auction, &item, 20, now),
            Err(DomainError::AuctionNotStarted)
        ));
    }

    #[test]
    fn test_bid_after_end_time_is_rejected() {
        let (auction, item, _) = fixture();
        let now = auction.end_time;
        assert!(matches!(
            check_bid_window(&auction, &item, 20, now),
            Err(DomainError::AuctionExpired)
        ));
    }

    /// 소유자는 금액과 무관하게 자기 상품에 입찰할 수 없다
    #[test]
    fn test_self_bid_is_always_rejected() {
        let (auction, item, now) = fixture();
        assert!(matches!(
            check_bid_window(&auction, &item, item.admin_id, now),
            Err(DomainError::SelfBidForbidden)
        ));
    }

    #[test]
    fn test_unparseable_amount_is_rejected() {
        for raw in ["abc", "", "1.2.3", "NaN", "1e10"] {
            assert!(matches!(
                validate_amount(raw, dec!(1000)),
                Err(DomainError::InvalidBidAmount)
            ));
        }
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        for raw in ["0", "-1", "-1500000.00"] {
            assert!(matches!(
                validate_amount(raw, dec!(1000)),
                Err(DomainError::InvalidBidAmount)
            ));
        }
    }

    /// 현재 가격과 같은 금액은 거절, 0.01 초과부터 허용
    #[test]
    fn test_tie_is_rejected_and_next_tick_is_accepted() {
        let current = dec!(1500000.00);
        assert!(matches!(
            validate_amount("1500000.00", current),
            Err(DomainError::BidTooLow { .. })
        ));
        assert_eq!(
            validate_amount("1500000.01", current).unwrap(),
            dec!(1500000.01)
        );
    }

    #[test]
    fn test_low_bid_carries_fresh_price() {
        let current = dec!(2000000.00);
        match validate_amount("1600000.00", current) {
            Err(DomainError::BidTooLow { current_price }) => {
                assert_eq!(current_price, current);
            }
            other => panic!("LOW_BID 이어야 합니다: {:?}", other),
        }
    }
}
// endregion: --- Tests
