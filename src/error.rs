/// 도메인 오류 타입
/// 모든 도메인 오류는 클라이언트에게 {"error", "code"} 형태의 JSON으로 반환된다.
// region:    --- Imports
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
// endregion: --- Imports

// region:    --- Domain Error
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("상품을 찾을 수 없습니다.")]
    ItemNotFound,

    #[error("경매를 찾을 수 없습니다.")]
    AuctionNotFound,

    #[error("해당 상품에 대한 경매가 이미 존재합니다.")]
    AuctionAlreadyExists,

    #[error("경매가 진행 중이 아닙니다.")]
    AuctionNotRunning,

    #[error("경매가 아직 시작되지 않았습니다.")]
    AuctionNotStarted,

    #[error("경매가 이미 종료되었습니다.")]
    AuctionExpired,

    #[error("자신의 상품에는 입찰할 수 없습니다.")]
    SelfBidForbidden,

    #[error("유효하지 않은 입찰 금액입니다.")]
    InvalidBidAmount,

    #[error("입찰 금액이 현재 가격보다 낮습니다.")]
    BidTooLow { current_price: Decimal },

    /// 낙관적 커밋 충돌, 재시도 후에도 남으면 외부로 노출되지 않는다
    #[error("버전 충돌")]
    CommitConflict,

    #[error("최대 재시도 횟수 초과")]
    MaxRetriesExceeded,

    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    /// 클라이언트용 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ItemNotFound => "ITEM_NOT_FOUND",
            DomainError::AuctionNotFound => "AUCTION_NOT_FOUND",
            DomainError::AuctionAlreadyExists => "AUCTION_EXISTS",
            DomainError::AuctionNotRunning => "NOT_RUNNING",
            DomainError::AuctionNotStarted => "NOT_STARTED",
            DomainError::AuctionExpired => "ALREADY_ENDED",
            DomainError::SelfBidForbidden => "SELF_BID",
            DomainError::InvalidBidAmount => "INVALID_AMOUNT",
            DomainError::BidTooLow { .. } => "LOW_BID",
            DomainError::CommitConflict => "VERSION_CONFLICT",
            DomainError::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            DomainError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP 상태 코드
    /// 도메인 오류는 400, 인프라 오류는 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// 응답 바디 생성
    pub fn to_json(&self) -> Value {
        match self {
            DomainError::BidTooLow { current_price } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        }
    }
}
// endregion: --- Domain Error

// endregion: --- Tests
