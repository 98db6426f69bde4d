use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 입찰 모델
// 생성 이후 불변, 수정/삭제되지 않는다
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// 입찰 생성 파라미터
#[derive(Debug, Clone)]
pub struct NewBid {
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
