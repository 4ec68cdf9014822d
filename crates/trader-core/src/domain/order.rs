//! 주문 요청 및 실행 결과.
//!
//! 이 모듈은 터미널로 전달되는 주문 타입을 정의합니다:
//! - `TpSlUnit` / `TpSl` - 익절·손절 지정 방식
//! - `OrderRequest` - 주문 요청
//! - `OrderResult` - 체결 결과

use crate::domain::signal::TradeAction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 익절/손절 값의 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TpSlUnit {
    /// pips 거리
    Pips,
    /// 절대 가격
    Price,
}

/// 단위가 지정된 익절/손절 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpSl {
    /// 값
    pub value: Decimal,
    /// 단위
    pub unit: TpSlUnit,
}

impl TpSl {
    /// pips 단위 값을 생성합니다.
    pub fn pips(value: impl Into<Decimal>) -> Self {
        Self {
            value: value.into(),
            unit: TpSlUnit::Pips,
        }
    }

    /// 절대 가격 값을 생성합니다.
    pub fn price(value: Decimal) -> Self {
        Self {
            value,
            unit: TpSlUnit::Price,
        }
    }

    /// 진입가 기준 절대 가격으로 변환합니다.
    ///
    /// pips 단위면 `entry ± pips * pip_size` 로 환산하며,
    /// `toward_profit` 과 액션 방향에 따라 부호가 결정됩니다.
    pub fn resolve(&self, entry: Decimal, action: TradeAction, pip: Decimal, toward_profit: bool) -> Decimal {
        match self.unit {
            TpSlUnit::Price => self.value,
            TpSlUnit::Pips => {
                let distance = self.value * pip;
                let up = match (action, toward_profit) {
                    (TradeAction::Buy, true) | (TradeAction::Sell, false) => true,
                    (TradeAction::Buy, false) | (TradeAction::Sell, true) => false,
                    (TradeAction::None, _) => return entry,
                };
                if up {
                    entry + distance
                } else {
                    entry - distance
                }
            }
        }
    }
}

/// 터미널로 제출되는 주문 요청.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 심볼
    pub symbol: String,
    /// 매수/매도
    pub action: TradeAction,
    /// 랏 크기
    pub volume: Decimal,
    /// 익절 가격 (절대값)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    /// 손절 가격 (절대값)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// 주문 코멘트 (전략 이름 등)
    pub comment: String,
}

impl OrderRequest {
    /// 새 주문 요청을 생성합니다.
    pub fn new(symbol: impl Into<String>, action: TradeAction, volume: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            action,
            volume,
            take_profit: None,
            stop_loss: None,
            comment: String::new(),
        }
    }

    /// 익절/손절 가격을 설정합니다.
    pub fn with_levels(mut self, take_profit: Option<Decimal>, stop_loss: Option<Decimal>) -> Self {
        self.take_profit = take_profit;
        self.stop_loss = stop_loss;
        self
    }

    /// 코멘트를 설정합니다.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// 체결된 주문의 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    /// 포지션 티켓
    pub ticket: Uuid,
    /// 심볼
    pub symbol: String,
    /// 체결 방향
    pub action: TradeAction,
    /// 체결 수량
    pub volume: Decimal,
    /// 체결 가격
    pub price: Decimal,
    /// 체결 시각
    pub executed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tp_resolves_above_entry_for_buy() {
        let tp = TpSl::pips(dec!(20));
        let price = tp.resolve(dec!(1.1000), TradeAction::Buy, dec!(0.0001), true);
        assert_eq!(price, dec!(1.1020));
    }

    #[test]
    fn test_sl_resolves_below_entry_for_buy() {
        let sl = TpSl::pips(dec!(10));
        let price = sl.resolve(dec!(1.1000), TradeAction::Buy, dec!(0.0001), false);
        assert_eq!(price, dec!(1.0990));
    }

    #[test]
    fn test_tp_resolves_below_entry_for_sell() {
        let tp = TpSl::pips(dec!(20));
        let price = tp.resolve(dec!(1.1000), TradeAction::Sell, dec!(0.0001), true);
        assert_eq!(price, dec!(1.0980));
    }

    #[test]
    fn test_price_unit_passes_through() {
        let tp = TpSl::price(dec!(1.25));
        let price = tp.resolve(dec!(1.1000), TradeAction::Buy, dec!(0.0001), true);
        assert_eq!(price, dec!(1.25));
    }

    #[test]
    fn test_order_request_builder() {
        let request = OrderRequest::new("EURUSD", TradeAction::Buy, dec!(0.01))
            .with_levels(Some(dec!(1.1020)), Some(dec!(1.0990)))
            .with_comment("Scalping");

        assert_eq!(request.symbol, "EURUSD");
        assert_eq!(request.take_profit, Some(dec!(1.1020)));
        assert_eq!(request.comment, "Scalping");
    }
}
