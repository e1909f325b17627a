//! # 스캔/리딤 확인 API 라우트 핸들러
//!
//! QR 코드를 스캔했을 때 호출되는 핸들러들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /scan-qr?code=... | `scan_qr` | QR 스캔 진입점 (카메라 앱이 여는 URL) |
//! | POST | /check-scan | `check_scan` | 리딤 여부 확인 (본문으로 코드 전달) |
//!
//! 두 엔드포인트는 같은 리딤 서비스(services/redeem.rs)를 호출하고
//! 같은 응답 본문을 반환합니다. `/scan-qr`은 QR 코드에 인쇄된 GET URL이고,
//! `/check-scan`은 POS 단말 등이 직접 부르는 POST API입니다.
//! 둘 사이는 프로세스 내 함수 호출로 연결됩니다 — 자기 자신에게
//! HTTP 요청을 보내는 우회는 없습니다.

use crate::{
    error::AppError,           // 에러 타입 (자동으로 HTTP 에러 응답으로 변환됨)
    models::*,                 // 요청/응답 구조체들 (ScanQuery, CheckScanRequest 등)
    routes::qr::AppState,      // 애플리케이션 공유 상태 (저장소, 공개 URL)
    services::redeem,          // 리딤 상태 머신
};
use axum::{
    extract::{Query, State}, // Axum 추출자: 쿼리 스트링, 앱 상태 추출
    Json,                    // JSON 요청/응답 처리
};

/// QR 코드 스캔 진입점 — 스캔한 코드의 리딤 여부를 확인합니다.
///
/// `GET /scan-qr?code=5551234`
/// → `{ "message": "✅ Offer redeemed successfully for 5551234", "scanCount": 1 }`
///
/// `Query(query)`: URL의 쿼리 스트링(?code=...)을 구조체로 추출합니다.
///
/// ## 에러
/// - `code` 파라미터가 없거나 빈 문자열이면 → 400 "Invalid QR Code."
///   (저장소를 건드리기 전에 거절 — 빈 키가 생기는 것을 막습니다)
pub async fn scan_qr(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<Json<CheckScanResponse>, AppError> {
    // Option.filter(): Some이어도 조건(비어 있지 않음)에 맞지 않으면 None으로
    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid QR Code.".to_string()))?;

    // 리딤 확인은 프로세스 내 직접 호출입니다.
    let result = redeem::check_scan(&state.store, &code).await?;
    Ok(Json(result))
}

/// 코드의 리딤 여부를 확인하고 스캔을 기록합니다.
///
/// `POST /check-scan` + `{ "code": "5551234" }`
/// → `{ "message": "...", "scanCount": n }`
///
/// 첫 확인은 성공 메시지와 `scanCount: 1`을,
/// 이후의 모든 확인은 실패 메시지와 1씩 증가한 횟수를 반환합니다.
/// (상태 머신 규칙은 services/redeem.rs 참고)
///
/// ## 에러
/// - `code` 필드가 없거나 빈 문자열이면 → 400 "Invalid request."
pub async fn check_scan(
    State(state): State<AppState>,
    Json(req): Json<CheckScanRequest>,
) -> Result<Json<CheckScanResponse>, AppError> {
    let code = req
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid request.".to_string()))?;

    let result = redeem::check_scan(&state.store, &code).await?;
    Ok(Json(result))
}

// ── 테스트 ──
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScanStore;
    use std::sync::Arc;

    async fn test_state(dir: &tempfile::TempDir) -> AppState {
        let store = ScanStore::load(dir.path().join("scan_counts.json"))
            .await
            .unwrap();
        AppState {
            store: Arc::new(store),
            public_url: "http://localhost:3000".to_string(),
        }
    }

    #[tokio::test]
    async fn first_check_scan_redeems_successfully() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let Json(response) = check_scan(
            State(state),
            Json(CheckScanRequest {
                code: Some("5551234".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            response.message,
            "✅ Offer redeemed successfully for 5551234"
        );
        assert_eq!(response.scan_count, 1);
    }

    #[tokio::test]
    async fn second_check_scan_reports_already_redeemed() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let request = || {
            Json(CheckScanRequest {
                code: Some("5551234".to_string()),
            })
        };
        check_scan(State(state.clone()), request()).await.unwrap();

        let Json(response) = check_scan(State(state), request()).await.unwrap();
        assert_eq!(response.message, "❌ Offer already redeemed.");
        assert_eq!(response.scan_count, 2);
    }

    #[tokio::test]
    async fn check_scan_without_code_is_a_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        // 본문 {}: code 필드 누락 → serde(default)로 None → 400
        let missing = check_scan(
            State(state.clone()),
            Json(CheckScanRequest { code: None }),
        )
        .await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        // 빈 문자열도 저장소를 건드리기 전에 거절됩니다.
        let empty = check_scan(
            State(state.clone()),
            Json(CheckScanRequest {
                code: Some(String::new()),
            }),
        )
        .await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));
        // 거절된 요청은 항목을 만들지 않습니다.
        assert_eq!(state.store.get("").await, 0);
    }

    #[tokio::test]
    async fn scan_qr_uses_the_same_state_machine() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        // GET /scan-qr 로 첫 스캔
        let Json(first) = scan_qr(
            State(state.clone()),
            Query(ScanQuery {
                code: Some("5551234".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(first.scan_count, 1);
        assert!(first.message.starts_with("✅"));

        // 이어서 POST /check-scan 으로 확인해도 같은 카운터를 공유합니다.
        let Json(second) = check_scan(
            State(state),
            Json(CheckScanRequest {
                code: Some("5551234".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(second.scan_count, 2);
        assert!(second.message.starts_with("❌"));
    }

    #[tokio::test]
    async fn scan_qr_without_code_is_a_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let missing = scan_qr(State(state.clone()), Query(ScanQuery { code: None })).await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        let empty = scan_qr(
            State(state),
            Query(ScanQuery {
                code: Some(String::new()),
            }),
        )
        .await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));
    }
}
