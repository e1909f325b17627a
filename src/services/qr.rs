//! # QR 코드 인코딩 서비스
//!
//! 스캔 URL 문자열을 브라우저에 바로 넣을 수 있는
//! data URL(base64 PNG) 형태의 QR 코드 이미지로 변환합니다.
//!
//! ## 파이프라인
//! 1. `qrcode`: URL 문자열 → QR 비트 매트릭스
//! 2. `image`: 비트 매트릭스 → 흑백(Luma) 픽셀 버퍼 → PNG 바이트
//! 3. `base64`: PNG 바이트 → "data:image/png;base64,..." 문자열
//!
//! QR 인코딩 알고리즘 자체(비트를 스캔 가능한 패턴으로 배치하는 방법)는
//! 전적으로 qrcode 크레이트에 위임합니다.

use crate::error::AppError;
// Engine 트레이트: base64 0.22의 인코딩 API. `as _`는 트레이트 메서드만
// 쓰고 이름은 가져오지 않겠다는 의미입니다.
use base64::{engine::general_purpose::STANDARD, Engine as _};
// Luma<u8>: 채널이 하나(밝기)뿐인 흑백 픽셀 타입 — QR 코드에 딱 맞습니다.
use image::{ImageFormat, Luma};
use qrcode::QrCode;
// Cursor: 메모리 버퍼(Vec<u8>)를 파일처럼 읽고 쓸 수 있게 하는 어댑터.
// PNG 인코더가 Write + Seek을 요구하므로 필요합니다.
use std::io::Cursor;

/// URL을 QR 코드로 인코딩하여 PNG data URL로 반환합니다.
///
/// # 매개변수
/// - `url`: QR 코드에 담을 스캔 URL
///
/// # 반환값
/// - `Ok(String)`: "data:image/png;base64,..." — `<img src>`에 그대로 사용 가능
/// - `Err(AppError::Qr)`: URL이 QR 용량을 초과하는 등 인코딩 실패
/// - `Err(AppError::Image)`: PNG 인코딩 실패
pub fn qr_data_url(url: &str) -> Result<String, AppError> {
    // QrCode::new(): 데이터 길이에 맞는 버전(크기)과 오류 정정 레벨을
    // 자동으로 골라 QR 매트릭스를 생성합니다.
    let code = QrCode::new(url.as_bytes())?;

    // .render::<Luma<u8>>(): 매트릭스를 흑백 픽셀 버퍼로 렌더링합니다.
    // min_dimensions: 휴대폰 카메라로 인쇄물을 찍어도 읽히도록 최소 크기를 보장
    let pixels = code.render::<Luma<u8>>().min_dimensions(200, 200).build();

    // PNG 바이트를 메모리 버퍼에 씁니다 (디스크를 거치지 않음 —
    // 생성된 이미지는 저장하지 않고 응답으로만 반환합니다).
    let mut png = Cursor::new(Vec::new());
    pixels.write_to(&mut png, ImageFormat::Png)?;

    // get_ref(): Cursor가 감싼 Vec<u8>의 참조를 얻습니다.
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.get_ref())
    ))
}
