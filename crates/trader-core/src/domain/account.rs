//! 계좌 정보 및 포지션.
//!
//! 이 모듈은 터미널에서 조회되는 계좌 상태 타입을 정의합니다:
//! - `AccountInfo` - 계좌 스냅샷 (잔고/증거금)
//! - `Position` - 보유 포지션 엔티티

use crate::domain::signal::TradeAction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 터미널에서 조회한 계좌 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// 잔고
    pub balance: Decimal,
    /// 순자산 (잔고 + 미실현 손익)
    pub equity: Decimal,
    /// 사용 중 증거금
    pub margin: Decimal,
    /// 가용 증거금
    pub margin_free: Decimal,
    /// 계좌 거래 허용 여부
    pub trade_allowed: bool,
    /// 통화
    pub currency: String,
}

impl AccountInfo {
    /// 증거금 수준 (%). 증거금이 0이면 0을 반환합니다.
    pub fn margin_level_pct(&self) -> Decimal {
        if self.margin > Decimal::ZERO {
            self.equity / self.margin * Decimal::from(100)
        } else {
            Decimal::ZERO
        }
    }
}

/// 보유 중인 포지션.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// 포지션 티켓
    pub ticket: Uuid,
    /// 심볼
    pub symbol: String,
    /// 방향
    pub action: TradeAction,
    /// 수량 (랏)
    pub volume: Decimal,
    /// 진입 가격
    pub open_price: Decimal,
    /// 현재 가격
    pub current_price: Decimal,
    /// 익절 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    /// 손절 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// 미실현 손익
    pub profit: Decimal,
    /// 진입 시각
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// 새 포지션을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        action: TradeAction,
        volume: Decimal,
        open_price: Decimal,
    ) -> Self {
        Self {
            ticket: Uuid::new_v4(),
            symbol: symbol.into(),
            action,
            volume,
            open_price,
            current_price: open_price,
            take_profit: None,
            stop_loss: None,
            profit: Decimal::ZERO,
            opened_at: Utc::now(),
        }
    }

    /// 익절/손절 가격을 설정합니다.
    pub fn with_levels(mut self, take_profit: Option<Decimal>, stop_loss: Option<Decimal>) -> Self {
        self.take_profit = take_profit;
        self.stop_loss = stop_loss;
        self
    }

    /// 현재 가격을 갱신하고 미실현 손익을 다시 계산합니다.
    pub fn mark_price(&mut self, price: Decimal) {
        self.current_price = price;
        let direction = match self.action {
            TradeAction::Buy => Decimal::ONE,
            TradeAction::Sell => -Decimal::ONE,
            TradeAction::None => Decimal::ZERO,
        };
        self.profit = (price - self.open_price) * self.volume * direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_margin_level_pct() {
        let account = AccountInfo {
            balance: dec!(10000),
            equity: dec!(9000),
            margin: dec!(3000),
            margin_free: dec!(6000),
            trade_allowed: true,
            currency: "USD".to_string(),
        };
        assert_eq!(account.margin_level_pct(), dec!(300));
    }

    #[test]
    fn test_margin_level_zero_margin_guarded() {
        let account = AccountInfo {
            balance: dec!(10000),
            equity: dec!(10000),
            margin: Decimal::ZERO,
            margin_free: dec!(10000),
            trade_allowed: true,
            currency: "USD".to_string(),
        };
        assert_eq!(account.margin_level_pct(), Decimal::ZERO);
    }

    #[test]
    fn test_mark_price_updates_profit() {
        let mut position = Position::new("EURUSD", TradeAction::Buy, dec!(1), dec!(1.1000));
        position.mark_price(dec!(1.1050));
        assert_eq!(position.profit, dec!(0.0050));

        let mut short = Position::new("EURUSD", TradeAction::Sell, dec!(1), dec!(1.1000));
        short.mark_price(dec!(1.1050));
        assert_eq!(short.profit, dec!(-0.0050));
    }
}
