//! # QR 발급 API 라우트 핸들러
//!
//! 전화번호 목록을 받아 번호마다 리딤용 QR 코드를 발급하는 핸들러입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /generate-qr | `generate_qr` | QR 코드 일괄 발급 |
//!
//! ## Axum 핸들러 패턴
//! 각 함수는 Axum의 **추출자(Extractor)** 패턴을 따릅니다:
//! - `State(state)`: 애플리케이션 공유 상태 (저장소, 공개 URL)
//! - `Json(body)`: 요청 본문을 JSON으로 파싱

// ── 의존성 가져오기 ──
use crate::{
    error::AppError,                  // 에러 타입 (자동으로 HTTP 에러 응답으로 변환됨)
    models::QrImage,                  // 응답 구조체
    services::{normalize, qr},        // 정규화 / QR 인코딩 서비스
    store::ScanStore,                 // 스캔 카운트 저장소
};
use axum::{
    extract::State, // Axum 추출자: 앱 상태 추출
    Json,           // JSON 요청/응답 처리
};
use serde_json::{json, Value}; // JSON 객체 생성용 매크로와 범용 JSON 타입
use std::sync::Arc;            // 참조 카운트 스마트 포인터

// #[derive(Clone)]: AppState가 Clone 트레이트를 구현하게 합니다.
// Axum의 State Extractor는 내부적으로 AppState를 clone하므로 필수입니다.
// ScanStore는 Arc로 감싸져 있어 clone해도 저장소가 복제되지 않고
// 모든 핸들러가 같은 저장소를 가리킵니다.
#[derive(Clone)]
/// 모든 요청 핸들러가 공유하는 애플리케이션 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 전역 변수 대신 기동 시 한 번 만들어 주입하는 구조라서,
/// 테스트에서는 임시 파일 위의 저장소로 독립된 상태를 만들 수 있습니다.
pub struct AppState {
    /// 스캔 카운트 저장소 (모든 핸들러가 공유)
    pub store: Arc<ScanStore>,
    /// 스캔 URL의 베이스 주소 (QR 코드에 인코딩됨)
    pub public_url: String,
}

/// 전화번호 목록으로 QR 코드를 일괄 발급합니다.
///
/// `POST /generate-qr` + `{ "phoneNumbers": ["555-1234", ...] }`
/// → `{ "message": "...", "images": [{ "phone", "qrCode", "scanUrl" }] }`
///
/// ## 처리 흐름 (번호마다)
/// 1. 번호를 정규화하여 저장 키(식별자)를 만듭니다 ("555-1234" → "5551234")
/// 2. `<public_url>/scan-qr?code=<식별자>` 형태의 정식 스캔 URL을 만듭니다
/// 3. 스캔 URL을 QR 코드 data URL로 인코딩합니다
///
/// 배치 전체가 인코딩에 성공한 뒤에야 식별자들을 저장소에 등록합니다
/// (`ensure_all` — flush는 배치당 한 번). 발급은 항목을 0으로 만들 뿐
/// 스캔 횟수를 올리지 않으므로, 발급 직후의 첫 스캔이 리딤 성공이 됩니다.
///
/// ## 에러
/// - `phoneNumbers`가 없거나, 배열이 아니거나, 비어 있거나, 문자열이 아닌
///   원소를 담고 있으면 → 400
/// - 한 건이라도 QR 인코딩에 실패하면 → 요청 전체가 500 (부분 성공 없음)
///
/// 본문을 `Json<Value>`로 받아 직접 검사하는 이유:
/// 타입이 지정된 추출자는 형태 오류를 422로 거절하는데,
/// 이 API의 외부 계약은 모든 잘못된 본문에 400을 요구하기 때문입니다.
pub async fn generate_qr(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    // .get(): JSON 객체에서 키를 찾습니다 (없으면 None)
    // .and_then(Value::as_array): 값이 배열일 때만 &Vec<Value>로 꺼냅니다
    // .filter(): 빈 배열을 "없음"과 동일하게 탈락시킵니다
    // .ok_or_else(): Option → Result 변환, None이면 400 에러
    let numbers = body
        .get("phoneNumbers")
        .and_then(Value::as_array)
        .filter(|numbers| !numbers.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Please provide an array of phone numbers.".to_string())
        })?;

    // with_capacity: 원소 수를 미리 알고 있으므로 재할당 없이 한 번에 확보
    let mut images = Vec::with_capacity(numbers.len());
    let mut codes = Vec::with_capacity(numbers.len());

    for entry in numbers {
        // 배열 원소가 문자열이 아니면 목록 전체를 잘못된 요청으로 처리합니다.
        let phone = entry.as_str().ok_or_else(|| {
            AppError::BadRequest("Please provide an array of phone numbers.".to_string())
        })?;

        let code = normalize::normalize_identifier(phone);

        // 정식 스캔 URL — 이 문자열이 QR 코드에 그대로 인코딩됩니다.
        let scan_url = format!("{}/scan-qr?code={}", state.public_url, code);
        let qr_code = qr::qr_data_url(&scan_url)?;

        images.push(QrImage {
            phone: phone.to_string(),
            qr_code,
            scan_url,
        });
        codes.push(code);
    }

    // 배치 전체가 성공한 뒤 식별자들을 0 카운트로 등록합니다.
    // flush는 여기서 한 번 — 번호마다 파일을 다시 쓰지 않습니다.
    state.store.ensure_all(&codes).await?;

    tracing::debug!("Generated {} QR codes", images.len());

    Ok(Json(json!({
        "message": "QR codes generated successfully!",
        "images": images
    })))
}

// ── 테스트 ──
#[cfg(test)]
mod tests {
    use super::*;

    /// 임시 디렉토리 위의 저장소로 테스트용 AppState를 만듭니다.
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
    async fn generates_one_image_per_phone_number() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let Json(response) = generate_qr(
            State(state.clone()),
            Json(json!({ "phoneNumbers": ["555-1234"] })),
        )
        .await
        .unwrap();

        assert_eq!(response["message"], "QR codes generated successfully!");
        let images = response["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);

        // 원본 번호는 그대로, 스캔 URL은 정규화된 식별자로 끝나야 합니다.
        assert_eq!(images[0]["phone"], "555-1234");
        let scan_url = images[0]["scanUrl"].as_str().unwrap();
        assert!(scan_url.ends_with("code=5551234"));
        // QR 코드는 임베드 가능한 data URL이어야 합니다.
        let qr_code = images[0]["qrCode"].as_str().unwrap();
        assert!(qr_code.starts_with("data:image/png;base64,"));

        // 발급만으로는 스캔 횟수가 올라가지 않습니다 (0 카운트 등록만).
        assert_eq!(state.store.get("5551234").await, 0);
    }

    #[tokio::test]
    async fn missing_phone_numbers_field_is_a_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let result = generate_qr(State(state), Json(json!({}))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn non_array_and_empty_array_are_bad_requests() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let not_a_list = generate_qr(
            State(state.clone()),
            Json(json!({ "phoneNumbers": "555-1234" })),
        )
        .await;
        assert!(matches!(not_a_list, Err(AppError::BadRequest(_))));

        let empty = generate_qr(
            State(state.clone()),
            Json(json!({ "phoneNumbers": [] })),
        )
        .await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));

        let non_string_entry = generate_qr(
            State(state),
            Json(json!({ "phoneNumbers": [5551234] })),
        )
        .await;
        assert!(matches!(non_string_entry, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn regenerating_keeps_existing_scan_counts() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        generate_qr(
            State(state.clone()),
            Json(json!({ "phoneNumbers": ["555-1234"] })),
        )
        .await
        .unwrap();
        state.store.record_scan("5551234").await.unwrap();

        // 같은 번호로 다시 발급해도 이미 기록된 횟수는 보존됩니다 (ensure 멱등성).
        generate_qr(
            State(state.clone()),
            Json(json!({ "phoneNumbers": ["555-1234"] })),
        )
        .await
        .unwrap();
        assert_eq!(state.store.get("5551234").await, 1);
    }
}
