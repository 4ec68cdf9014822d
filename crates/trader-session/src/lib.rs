//! 시장 세션 판정.
//!
//! UTC 시각 기반의 세션 시계, 뉴스 블랙아웃 창, 세션 보정 신호
//! 임계값을 제공합니다. 모든 판정은 순수 함수이며 상태를 갖지 않습니다.

pub mod clock;
pub mod news;
pub mod threshold;

pub use clock::{current_session, session_at, session_priority, SessionDescriptor, Volatility};
pub use news::{active_blackout_at, is_blackout_at, is_blackout_now};
pub use threshold::session_adjusted_threshold;

use chrono::{DateTime, Utc};

/// 주어진 시각에 거래가 허용되는지 확인합니다.
///
/// 세션이 활성이고 블랙아웃이 아닐 때만 true입니다.
pub fn is_trading_permitted_at(at: DateTime<Utc>) -> bool {
    session_at(at).active && !is_blackout_at(at)
}

/// 현재 시각에 거래가 허용되는지 확인합니다.
pub fn is_trading_permitted() -> bool {
    is_trading_permitted_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trading_permitted_combines_session_and_blackout() {
        // 월요일 10:00 UTC - 유럽 세션, 블랙아웃 아님
        let clear = Utc.with_ymd_and_hms(2026, 8, 24, 10, 0, 0).unwrap();
        assert!(is_trading_permitted_at(clear));

        // 월요일 13:00 UTC - 세션은 활성이지만 블랙아웃
        let news = Utc.with_ymd_and_hms(2026, 8, 24, 13, 0, 0).unwrap();
        assert!(!is_trading_permitted_at(news));

        // 토요일 - 세션 비활성
        let weekend = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();
        assert!(!is_trading_permitted_at(weekend));
    }
}
