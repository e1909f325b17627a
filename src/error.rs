//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 에러 분류:
//! - 클라이언트 입력 오류(BadRequest) → 400, 메시지를 그대로 전달
//! - QR 인코딩/이미지 인코딩 실패 → 500, 내용은 로그에만 기록
//! - 파일 I/O, JSON 직렬화 실패 → 500, 내용은 로그에만 기록
//! - 스캔 카운트 파일 손상(Corrupt) → 기동 시점에 치명적(fatal)으로 처리

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]: 두 가지 derive 매크로를 적용합니다.
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 트레이트를 자동 구현.
//   #[error("...")] 어트리뷰트로 Display 트레이트(사람이 읽을 에러 메시지)도 자동 생성합니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 잘못된 요청 (HTTP 400)
    /// String을 포함하여 구체적인 에러 메시지를 전달합니다.
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// QR 코드 인코딩 오류 (HTTP 500)
    /// #[from]: qrcode 크레이트의 에러를 AppError로 자동 변환하는
    /// From 트레이트를 구현합니다. 이를 통해 QR 인코딩 함수에서
    /// `?` 연산자를 쓰면 자동으로 AppError::Qr로 변환됩니다.
    #[error("QR encoding error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// PNG 이미지 인코딩 오류 (HTTP 500)
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// 파일 입출력 오류 (HTTP 500)
    /// #[from]: std::io::Error → AppError::Io 자동 변환
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 직렬화/역직렬화 오류 (HTTP 500)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 스캔 카운트 파일 손상
    /// 기동 시 파일이 존재하는데 JSON 매핑으로 파싱되지 않는 경우입니다.
    /// 저장소 로딩 단계에서 발생하여 main의 `?`를 타고 올라가
    /// 서버 기동 자체를 실패시킵니다.
    #[error("Corrupt scan counts file: {0}")]
    Corrupt(String),
}

// impl IntoResponse for AppError:
// Axum의 IntoResponse 트레이트를 AppError에 구현합니다.
// 이를 통해 핸들러가 Err(AppError)를 반환하면,
// Axum이 자동으로 이 메서드를 호출하여 적절한 HTTP 응답을 생성합니다.
impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 각 에러 종류에 따라 적절한 HTTP 상태 코드와 JSON 에러 메시지를 생성합니다.
    /// 내부 에러(Qr, Image, Io, Json)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        // match: 패턴 매칭. enum의 각 variant에 대해 다른 처리를 합니다.
        // 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive).
        // (status, code, message) 튜플을 반환합니다.
        let (status, code, message) = match self {
            // ref: 패턴 매칭에서 값을 이동(move)하지 않고 참조만 빌려옵니다.
            // self가 이미 match에서 사용 중이므로, 내부 값은 참조로 접근합니다.
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            // QR/이미지 인코딩 실패는 하나의 클라이언트 메시지로 묶습니다.
            // 일괄 발급 중 한 건이라도 실패하면 요청 전체가 이 응답을 받습니다.
            AppError::Qr(ref e) => {
                tracing::error!("QR encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "qr_encoding_error",
                    "Failed to generate QR codes.".to_string(),
                )
            }
            AppError::Image(ref e) => {
                tracing::error!("Image encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "qr_encoding_error",
                    "Failed to generate QR codes.".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
            AppError::Json(ref e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "json_error",
                    "A serialization error occurred".to_string(),
                )
            }
            AppError::Corrupt(ref msg) => {
                // 정상적으로는 기동 단계에서만 발생하지만,
                // 혹시 응답 경로로 흘러오면 내부 오류로 처리합니다.
                tracing::error!("Corrupt scan counts file: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "corrupt_state",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // JSON 응답 본문을 생성합니다.
        // json! 매크로: Rust 코드로 JSON 구조를 직관적으로 작성할 수 있게 합니다.
        // 결과: { "error": { "code": "bad_request", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // (StatusCode, Json<Value>)를 Response로 변환합니다.
        // Axum은 튜플 (상태코드, 본문)을 자동으로 HTTP 응답으로 변환합니다.
        // .into_response(): IntoResponse 트레이트의 메서드를 호출
        (status, body).into_response()
    }
}
