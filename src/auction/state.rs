/// 경매 상태 기계
/// 기록된 상태와 현재 시각으로부터 유효 상태를 계산하는 순수 로직
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use chrono::{DateTime, Utc};
// endregion: --- Imports

// region:    --- State Machine

/// 유효 상태 계산
/// RUNNING 경매의 종료 시각이 지났으면 ENDED 로 본다(지연 만료, 아직 미반영일 수 있음)
pub fn effective_status(
    status: AuctionStatus,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AuctionStatus {
    match status {
        AuctionStatus::Running if now >= end_time => AuctionStatus::Ended,
        other => other,
    }
}

/// 만료 전이 필요 여부(기록 상태 RUNNING, 종료 시각 경과)
pub fn expiry_due(auction: &Auction, now: DateTime<Utc>) -> bool {
    auction.status == AuctionStatus::Running && now >= auction.end_time
}

impl Auction {
    /// 현재 시각 기준 유효 상태
    pub fn effective_status(&self, now: DateTime<Utc>) -> AuctionStatus {
        effective_status(self.status, self.end_time, now)
    }
}

// endregion: --- State Machine

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn auction_with(status: AuctionStatus) -> Auction {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Auction {
            id: 1,
            item_id: 1,
            status,
            start_time: start,
            end_time: start + Duration::minutes(30),
            current_price: dec!(10000),
            highest_bid_id: None,
            created_at: start,
        }
    }

    #[test]
    fn test_running_before_deadline_stays_running() {
        let auction = auction_with(AuctionStatus::Running);
        let now = auction.end_time - Duration::seconds(1);
        assert_eq!(auction.effective_status(now), AuctionStatus::Running);
        assert!(!expiry_due(&auction, now));
    }

    /// 종료 시각 정각부터 만료로 본다
    #[test]
    fn test_running_at_deadline_is_ended() {
        let auction = auction_with(AuctionStatus::Running);
        assert_eq!(
            auction.effective_status(auction.end_time),
            AuctionStatus::Ended
        );
        assert!(expiry_due(&auction, auction.end_time));
    }

    #[test]
    fn test_running_past_deadline_is_ended() {
        let auction = auction_with(AuctionStatus::Running);
        let now = auction.end_time + Duration::hours(1);
        assert_eq!(auction.effective_status(now), AuctionStatus::Ended);
    }

    /// 이미 종료된 경매는 재평가해도 변화가 없다
    #[test]
    fn test_ended_is_stable_under_reevaluation() {
        let auction = auction_with(AuctionStatus::Ended);
        let now = auction.end_time + Duration::hours(1);
        assert_eq!(auction.effective_status(now), AuctionStatus::Ended);
        assert!(!expiry_due(&auction, now));
    }

    /// DRAFT / CANCELED 는 시간 경과와 무관하게 그대로 유지된다
    #[test]
    fn test_inert_statuses_are_unaffected_by_time() {
        for status in [AuctionStatus::Draft, AuctionStatus::Canceled] {
            let auction = auction_with(status);
            let now = auction.end_time + Duration::days(1);
            assert_eq!(auction.effective_status(now), status);
            assert!(!expiry_due(&auction, now));
        }
    }
}
// endregion: --- Tests
