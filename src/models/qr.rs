//! # QR 발급 모델 정의
//!
//! QR 코드 일괄 발급 API(`POST /generate-qr`)의 응답에 쓰이는
//! 데이터 구조체를 정의합니다.
//!
//! 요청 본문은 구조체로 정의하지 않습니다: `phoneNumbers` 필드가
//! "없음 / 배열이 아님 / 빈 배열" 모두 HTTP 400으로 처리되어야 하는데,
//! 타입이 지정된 `Json<T>` 추출자는 형태 오류를 422로 거절하기 때문입니다.
//! 대신 핸들러가 `serde_json::Value`를 받아 직접 검사합니다.
//! (routes/qr.rs 참고)

use serde::Serialize;

/// 발급된 QR 코드 한 건 — 응답의 `images` 배열 원소에 대응합니다.
///
/// # derive 매크로 설명
/// - `Serialize`: 이 구조체를 JSON으로 변환할 수 있게 합니다 (API 응답 시 사용)
/// - `Clone`: 값을 복제할 수 있게 합니다 (.clone() 메서드 제공)
///
/// Deserialize를 빼고 Serialize만 derive한 이유:
/// 이 구조체는 서버 → 클라이언트 방향으로만 사용되므로
/// JSON 생성(Serialize)만 필요하고, JSON 파싱(Deserialize)은 불필요합니다.
#[derive(Debug, Clone, Serialize)]
pub struct QrImage {
    /// 요청에 들어온 원본 전화번호 (정규화 전 문자열 그대로)
    pub phone: String,
    /// 스캔 URL을 인코딩한 QR 코드 이미지
    /// (data:image/png;base64,... 형태의 data URL — 그대로 <img src>에 넣을 수 있음)
    /// #[serde(rename)]: JSON 필드명을 camelCase 외부 계약에 맞춥니다.
    #[serde(rename = "qrCode")]
    pub qr_code: String,
    /// QR 코드가 가리키는 스캔 URL
    /// (예: "https://qroffer.example.com/scan-qr?code=5551234")
    #[serde(rename = "scanUrl")]
    pub scan_url: String,
}
