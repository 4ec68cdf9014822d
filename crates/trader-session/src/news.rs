//! 뉴스 블랙아웃 시간대.
//!
//! 주요 경제 지표 발표 전후로 거래를 멈추는 UTC 분 단위 창을
//! 정의합니다. 모든 창은 양 끝 포함입니다.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// 분 단위 블랙아웃 창 (양 끝 포함).
#[derive(Debug, Clone, Copy)]
struct BlackoutWindow {
    start_min: u32,
    end_min: u32,
    label: &'static str,
}

impl BlackoutWindow {
    const fn new(start_h: u32, start_m: u32, end_h: u32, end_m: u32, label: &'static str) -> Self {
        Self {
            start_min: start_h * 60 + start_m,
            end_min: end_h * 60 + end_m,
            label,
        }
    }

    fn contains(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.start_min && minute_of_day <= self.end_min
    }
}

/// 매일 적용되는 블랙아웃 창.
const DAILY_WINDOWS: [BlackoutWindow; 3] = [
    BlackoutWindow::new(8, 30, 9, 30, "European market open"),
    BlackoutWindow::new(12, 30, 14, 30, "US indicators / market open"),
    BlackoutWindow::new(16, 0, 16, 30, "London fix"),
];

/// 수요일 전용 창 (FOMC 등 정례 발표).
const WEDNESDAY_WINDOWS: [BlackoutWindow; 1] =
    [BlackoutWindow::new(13, 0, 14, 0, "Wednesday scheduled releases")];

/// 금요일 전용 창 (고용 지표).
const FRIDAY_WINDOWS: [BlackoutWindow; 1] =
    [BlackoutWindow::new(12, 30, 15, 0, "Friday employment data")];

/// 주어진 시각에 적용 중인 블랙아웃 창의 라벨을 반환합니다.
pub fn active_blackout_at(at: DateTime<Utc>) -> Option<&'static str> {
    let minute_of_day = at.hour() * 60 + at.minute();

    for window in &DAILY_WINDOWS {
        if window.contains(minute_of_day) {
            return Some(window.label);
        }
    }

    let extra: &[BlackoutWindow] = match at.weekday() {
        Weekday::Wed => &WEDNESDAY_WINDOWS,
        Weekday::Fri => &FRIDAY_WINDOWS,
        _ => &[],
    };
    for window in extra {
        if window.contains(minute_of_day) {
            return Some(window.label);
        }
    }

    None
}

/// 주어진 시각이 블랙아웃인지 확인합니다.
pub fn is_blackout_at(at: DateTime<Utc>) -> bool {
    active_blackout_at(at).is_some()
}

/// 현재 시각이 블랙아웃인지 확인합니다.
pub fn is_blackout_now() -> bool {
    is_blackout_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monday_at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, h, m, 0).unwrap()
    }

    #[test]
    fn test_daily_window_endpoints_inclusive() {
        assert!(is_blackout_at(monday_at(8, 30)));
        assert!(is_blackout_at(monday_at(9, 30)));
        assert!(!is_blackout_at(monday_at(8, 29)));
        assert!(!is_blackout_at(monday_at(9, 31)));
    }

    #[test]
    fn test_london_fix_window() {
        assert!(is_blackout_at(monday_at(16, 0)));
        assert!(is_blackout_at(monday_at(16, 30)));
        assert!(!is_blackout_at(monday_at(16, 31)));
    }

    #[test]
    fn test_wednesday_window_only_on_wednesday() {
        // 수요일 13:00–14:00은 매일 창(12:30–14:30)에 이미 포함되므로
        // 라벨이 매일 창으로 판정된다. 창 자체의 요일 분기를 확인한다.
        let wednesday = Utc.with_ymd_and_hms(2026, 8, 26, 13, 30, 0).unwrap();
        assert!(is_blackout_at(wednesday));

        let monday = monday_at(13, 30);
        assert!(is_blackout_at(monday)); // 매일 창 12:30–14:30
    }

    #[test]
    fn test_friday_window_extends_past_daily() {
        // 금요일 14:45는 매일 창(~14:30) 밖이지만 금요일 창(12:30–15:00) 안
        let friday = Utc.with_ymd_and_hms(2026, 8, 28, 14, 45, 0).unwrap();
        assert!(is_blackout_at(friday));
        assert_eq!(active_blackout_at(friday), Some("Friday employment data"));

        let monday = monday_at(14, 45);
        assert!(!is_blackout_at(monday));
    }

    #[test]
    fn test_clear_time_is_not_blackout() {
        assert!(!is_blackout_at(monday_at(10, 0)));
        assert!(!is_blackout_at(monday_at(20, 0)));
        assert!(!is_blackout_at(monday_at(0, 0)));
    }
}
