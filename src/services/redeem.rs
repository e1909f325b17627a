//! # 리딤 서비스 — 코드별 상태 머신
//!
//! 코드 식별자 하나의 생애는 세 상태를 가집니다:
//!
//! ```text
//! UNSEEN ──(첫 ensure/스캔)──▶ AVAILABLE ──(첫 확인)──▶ REDEEMED ──(재확인)──▶ REDEEMED
//!  기록 없음                    scanCount == 0            scanCount >= 1
//! ```
//!
//! - `UNSEEN → AVAILABLE`: QR 발급 또는 첫 스캔 확인 시 암묵적으로 전이 (횟수 0 생성)
//! - `AVAILABLE → REDEEMED`: 횟수 0에서의 확인 — "리딤 성공"을 보고하고 1로 증가
//! - `REDEEMED → REDEEMED`: 이후의 모든 확인 — "이미 사용됨"을 보고하지만
//!   횟수는 계속 증가합니다. 횟수는 성공한 리딤 수가 아니라 **총 확인 시도 수**입니다.
//!   (의도된 동작 — 같은 쿠폰을 몇 번이나 다시 스캔했는지가 운영 지표가 됩니다)
//!
//! 종료 상태는 없습니다: 기록은 영구히 남고 스캔도 계속 받습니다.

use crate::error::AppError;
use crate::models::CheckScanResponse;
use crate::store::ScanStore;

/// 코드 한 건의 리딤 여부를 확인하고 스캔을 기록합니다.
///
/// 저장소의 `record_scan` 한 번으로 "생성 + 증가 + 영속화"가 잠금 한 번
/// 안에서 끝나므로, 증가 후의 횟수만 보고 전이를 판정할 수 있습니다:
/// 갱신된 횟수가 1이면 이 확인이 첫 스캔(AVAILABLE → REDEEMED)입니다.
///
/// 호출 전제: `code`는 비어 있지 않습니다. (누락/빈 값 검사는
/// 엔드포인트마다 에러 메시지가 다르므로 핸들러가 수행합니다)
/// 코드는 받은 그대로 키로 사용합니다 — 정규화는 발급 시점에 끝났고,
/// 정식 스캔 URL에는 이미 정규화된 식별자가 들어 있습니다.
pub async fn check_scan(store: &ScanStore, code: &str) -> Result<CheckScanResponse, AppError> {
    let scan_count = store.record_scan(code).await?;

    let message = if scan_count == 1 {
        // 첫 스캔: 리딤 성공
        format!("✅ Offer redeemed successfully for {}", code)
    } else {
        // 두 번째부터: 이미 사용된 코드
        "❌ Offer already redeemed.".to_string()
    };

    Ok(CheckScanResponse {
        message,
        scan_count,
    })
}
