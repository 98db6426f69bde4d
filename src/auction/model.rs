// region:    --- Imports
use crate::bidding::model::Bid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
// endregion: --- Imports

// region:    --- Models

/// 경매 상태
/// DRAFT / CANCELED 는 표현 가능하지만 본 코어의 어떤 연산도 생성하거나 소비하지 않는다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuctionStatus {
    Draft,
    Running,
    Ended,
    Canceled,
}

impl AuctionStatus {
    /// 저장소 바인딩용 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Draft => "DRAFT",
            AuctionStatus::Running => "RUNNING",
            AuctionStatus::Ended => "ENDED",
            AuctionStatus::Canceled => "CANCELED",
        }
    }
}

// 상품 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub base_price: Decimal,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

// 경매 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Auction {
    pub id: i64,
    pub item_id: i64,
    pub status: AuctionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub current_price: Decimal,
    pub highest_bid_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// 경매 생성 파라미터
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub item_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub current_price: Decimal,
}

// endregion: --- Models

// region:    --- View Models

/// 경매 상세(상품, 최고 입찰, 입찰 이력 포함)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuctionDetail {
    #[serde(flatten)]
    pub auction: Auction,
    pub item: Item,
    pub highest_bid: Option<Bid>,
    pub bids: Vec<Bid>,
}

/// 경매 목록 항목(입찰 이력 제외)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuctionSummary {
    #[serde(flatten)]
    pub auction: Auction,
    pub item: Item,
    pub highest_bid: Option<Bid>,
}

/// 강제 종료 결과
#[derive(Debug, Serialize, Clone)]
pub struct ForceEndResult {
    pub message: String,
    pub winner: Option<Bid>,
    pub auction: Auction,
}

// endregion: --- View Models

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_auction() -> Auction {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Auction {
            id: 1,
            item_id: 1,
            status: AuctionStatus::Running,
            start_time: start,
            end_time: start + chrono::Duration::minutes(30),
            current_price: dec!(1500000.00),
            highest_bid_id: None,
            created_at: start,
        }
    }

    /// 금액은 항상 고정 소수점 문자열로 직렬화되어야 한다
    #[test]
    fn test_auction_serializes_price_as_decimal_string() {
        let json = serde_json::to_value(sample_auction()).unwrap();
        assert_eq!(json["current_price"], "1500000.00");
        assert_eq!(json["status"], "RUNNING");
        assert!(json["highest_bid_id"].is_null());
    }

    #[test]
    fn test_status_wire_values() {
        for (status, expected) in [
            (AuctionStatus::Draft, "\"DRAFT\""),
            (AuctionStatus::Running, "\"RUNNING\""),
            (AuctionStatus::Ended, "\"ENDED\""),
            (AuctionStatus::Canceled, "\"CANCELED\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        }
    }
}
// endregion: --- Tests
