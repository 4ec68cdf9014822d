//! 중단 가능한 대기 헬퍼.
//!
//! 긴 대기는 모두 1초 단위로 쪼개 중단 신호를 약 1초 안에
//! 반영합니다. 강제 종료는 없습니다.

use std::time::Duration;
use tokio::sync::watch;

/// 대기 분할 단위.
const WAIT_INCREMENT: Duration = Duration::from_secs(1);

/// `duration` 동안 대기하되, 중단 신호가 오면 즉시 돌아옵니다.
///
/// 중단되어 일찍 돌아왔으면 `true`를 반환합니다.
pub async fn cancellable_sleep(duration: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    if *stop.borrow() {
        return true;
    }

    let mut remaining = duration;
    while remaining > Duration::ZERO {
        let step = remaining.min(WAIT_INCREMENT);
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return true;
                }
            }
            _ = tokio::time::sleep(step) => {
                remaining = remaining.saturating_sub(step);
            }
        }
    }
    false
}
