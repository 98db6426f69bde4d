/// 상품 조회
pub const FIND_ITEM: &str = "SELECT id, title, description, image_url, base_price, admin_id, created_at FROM items WHERE id = $1";

/// 상품 기준 경매 조회
pub const FIND_AUCTION_BY_ITEM: &str = "SELECT id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at FROM auctions WHERE item_id = $1";

/// 경매 조회
pub const FIND_AUCTION_BY_ID: &str = "SELECT id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at FROM auctions WHERE id = $1";

/// 모든 경매 조회
pub const LIST_AUCTIONS: &str = "SELECT id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at FROM auctions ORDER BY created_at DESC";

/// 경매 생성
pub const CREATE_AUCTION: &str = r#"
    INSERT INTO auctions (item_id, status, start_time, end_time, current_price)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at
"#;

/// 경매 상태 무조건 변경(강제 종료 등 관리자 전이)
pub const UPDATE_AUCTION_STATUS: &str = r#"
    UPDATE auctions SET status = $2
    WHERE id = $1
    RETURNING id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at
"#;

/// 지연 만료 반영
/// RUNNING 인 행에만 적용되므로 중복 평가는 무변경으로 끝난다
pub const EXPIRE_AUCTION: &str = r#"
    UPDATE auctions SET status = 'ENDED'
    WHERE id = $1 AND status = 'RUNNING'
    RETURNING id, item_id, status, start_time, end_time, current_price, highest_bid_id, created_at
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (auction_id, user_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, auction_id, user_id, amount, created_at
"#;

/// 낙찰 포인터 갱신(낙관적 커밋)
/// 읽었던 current_price 가 그대로일 때만 갱신, 아니면 0행으로 충돌 보고
pub const SETTLE_BID: &str = r#"
    UPDATE auctions SET highest_bid_id = $2, current_price = $3
    WHERE id = $1 AND current_price = $4 AND status = 'RUNNING'
"#;

/// 단일 입찰 조회
pub const FIND_BID: &str =
    "SELECT id, auction_id, user_id, amount, created_at FROM bids WHERE id = $1";

/// 입찰 이력 조회(최신순)
pub const BID_HISTORY: &str = r#"
    SELECT id, auction_id, user_id, amount, created_at
    FROM bids
    WHERE auction_id = $1
    ORDER BY created_at DESC, id DESC
"#;
