//! # 스캔(리딤 확인) 모델 정의
//!
//! 리딤 확인 API에서 사용하는 요청/응답 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `ScanQuery`: `GET /scan-qr?code=...`의 쿼리 스트링
//! - `CheckScanRequest`: `POST /check-scan`의 요청 본문
//! - `CheckScanResponse`: 두 엔드포인트가 공유하는 응답 본문

use serde::{Deserialize, Serialize};

/// 스캔 엔드포인트의 쿼리 스트링 — `GET /scan-qr?code=<식별자>`에 해당합니다.
///
/// `code`가 `Option<String>`인 이유:
/// 쿼리 파라미터가 아예 없어도 추출 자체는 성공시키고,
/// "없음/빈 문자열"을 핸들러에서 직접 HTTP 400으로 처리하기 위해서입니다.
/// (Option이 아니면 Axum이 파라미터 누락을 자체 에러로 거절합니다)
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    /// QR 코드에 담긴 정규화된 식별자
    pub code: Option<String>,
}

/// 리딤 확인 요청 — `POST /check-scan`의 요청 본문(body)에 해당합니다.
///
/// `#[serde(default)]`: 필드가 JSON에 없으면 Default 값(None)으로 채웁니다.
/// 덕분에 빈 본문 `{}`도 파싱에 성공하고, 누락 검사는 핸들러가 수행하여
/// 외부 계약대로 HTTP 400을 반환합니다.
#[derive(Debug, Deserialize)]
pub struct CheckScanRequest {
    /// 확인할 코드 식별자
    #[serde(default)]
    pub code: Option<String>,
}

/// 리딤 확인 응답 — `/check-scan`과 `/scan-qr`이 공유합니다.
///
/// 상태 머신 결과 메시지와 누적 스캔 횟수를 담습니다.
/// 스캔 횟수는 성공/실패와 무관하게 확인 시도마다 1씩 증가합니다.
#[derive(Debug, Clone, Serialize)]
pub struct CheckScanResponse {
    /// 사람이 읽을 결과 메시지
    /// (첫 스캔: "✅ Offer redeemed successfully for <code>",
    ///  이후: "❌ Offer already redeemed.")
    pub message: String,
    /// 이번 확인까지 포함한 누적 스캔 횟수
    #[serde(rename = "scanCount")]
    pub scan_count: u64,
}
