//! 시장 세션 시계.
//!
//! UTC 시각만으로 현재 세션을 판정하는 순수 함수입니다. 세션 정보는
//! 호출 시마다 다시 계산되며 어디에도 저장되지 않습니다.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// 세션 변동성 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    /// 시장 휴장
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Volatility::None => "NONE",
            Volatility::Low => "LOW",
            Volatility::Medium => "MEDIUM",
            Volatility::High => "HIGH",
            Volatility::VeryHigh => "VERY_HIGH",
        };
        write!(f, "{}", label)
    }
}

/// 특정 시각의 시장 세션 기술자.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// 세션 이름
    pub name: &'static str,
    /// 거래 활성 여부
    pub active: bool,
    /// 변동성 등급
    pub volatility: Volatility,
    /// 리스크 배율 (랏 크기 보정용)
    pub risk_modifier: f64,
    /// 세션에서 유동성이 좋은 추천 심볼
    pub recommended_symbols: Vec<&'static str>,
}

/// 주어진 UTC 시각의 세션을 판정합니다.
///
/// 밴드 규칙 (UTC 시 기준):
/// - 주말은 휴장
/// - 13–17시: 유럽/미국 겹침 (가장 먼저 판정)
/// - 0–9시: 아시아
/// - 8–17시: 유럽
/// - 13–22시: 미국
/// - 그 외: 태평양
pub fn session_at(at: DateTime<Utc>) -> SessionDescriptor {
    let weekday = at.weekday();
    if weekday == Weekday::Sat || weekday == Weekday::Sun {
        return SessionDescriptor {
            name: "Weekend",
            active: false,
            volatility: Volatility::None,
            risk_modifier: 0.0,
            recommended_symbols: vec![],
        };
    }

    let hour = at.hour();

    // 겹침 구간이 유럽/미국 단독 구간보다 우선한다
    if (13..17).contains(&hour) {
        return SessionDescriptor {
            name: "European-US Overlap",
            active: true,
            volatility: Volatility::VeryHigh,
            risk_modifier: 1.5,
            recommended_symbols: vec!["EURUSD", "GBPUSD", "USDJPY", "XAUUSD"],
        };
    }

    if hour < 9 {
        return SessionDescriptor {
            name: "Asian",
            active: true,
            volatility: Volatility::Low,
            risk_modifier: 0.8,
            recommended_symbols: vec!["USDJPY", "AUDUSD", "AUDJPY", "EURJPY"],
        };
    }

    if (8..17).contains(&hour) {
        return SessionDescriptor {
            name: "European",
            active: true,
            volatility: Volatility::High,
            risk_modifier: 1.2,
            recommended_symbols: vec!["EURUSD", "GBPUSD", "EURGBP", "USDCHF"],
        };
    }

    if (13..22).contains(&hour) {
        return SessionDescriptor {
            name: "US",
            active: true,
            volatility: Volatility::Medium,
            risk_modifier: 1.0,
            recommended_symbols: vec!["EURUSD", "USDCAD", "USDJPY", "XAUUSD"],
        };
    }

    SessionDescriptor {
        name: "Pacific",
        active: true,
        volatility: Volatility::Low,
        risk_modifier: 0.7,
        recommended_symbols: vec!["AUDUSD", "NZDUSD", "USDJPY"],
    }
}

/// 현재 시각의 세션을 판정합니다.
pub fn current_session() -> SessionDescriptor {
    session_at(Utc::now())
}

/// 변동성 기준 세션 우선순위 (5 = 최고).
pub fn session_priority(volatility: Volatility) -> u8 {
    match volatility {
        Volatility::VeryHigh => 5,
        Volatility::High => 4,
        Volatility::Medium => 3,
        Volatility::Low => 2,
        Volatility::None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_weekend_is_inactive() {
        // 2026-08-29는 토요일
        let session = session_at(utc(2026, 8, 29, 14, 0));
        assert!(!session.active);
        assert_eq!(session.volatility, Volatility::None);
        assert_eq!(session.risk_modifier, 0.0);
    }

    #[test]
    fn test_wednesday_overlap_is_very_high() {
        // 2026-08-26은 수요일, 14:00 UTC는 유럽/미국 겹침
        let session = session_at(utc(2026, 8, 26, 14, 0));
        assert!(session.active);
        assert_eq!(session.name, "European-US Overlap");
        assert_eq!(session.volatility, Volatility::VeryHigh);
        assert_eq!(session.risk_modifier, 1.5);
    }

    #[test]
    fn test_band_boundaries() {
        let monday = |h, m| session_at(utc(2026, 8, 24, h, m));

        assert_eq!(monday(0, 0).name, "Asian");
        assert_eq!(monday(8, 59).name, "Asian");
        assert_eq!(monday(9, 0).name, "European");
        assert_eq!(monday(12, 59).name, "European");
        assert_eq!(monday(13, 0).name, "European-US Overlap");
        assert_eq!(monday(16, 59).name, "European-US Overlap");
        assert_eq!(monday(17, 0).name, "US");
        assert_eq!(monday(21, 59).name, "US");
        assert_eq!(monday(22, 0).name, "Pacific");
        assert_eq!(monday(23, 59).name, "Pacific");
    }

    #[test]
    fn test_session_priority_ordering() {
        assert_eq!(session_priority(Volatility::VeryHigh), 5);
        assert_eq!(session_priority(Volatility::High), 4);
        assert_eq!(session_priority(Volatility::Medium), 3);
        assert_eq!(session_priority(Volatility::Low), 2);
        assert_eq!(session_priority(Volatility::None), 1);
    }

    #[test]
    fn test_overlap_recommends_majors() {
        let session = session_at(utc(2026, 8, 24, 15, 0));
        assert!(session.recommended_symbols.contains(&"EURUSD"));
        assert!(session.recommended_symbols.contains(&"XAUUSD"));
    }
}
