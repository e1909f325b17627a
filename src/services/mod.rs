//! # 서비스 모듈
//!
//! 라우트 핸들러가 사용하는 도메인 로직/유틸리티 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `normalize`: 전화번호 → 저장 키(식별자) 정규화
//! - `qr`: 스캔 URL을 QR 코드 data URL로 인코딩
//! - `redeem`: 리딤 상태 머신 (첫 스캔 성공, 이후 "이미 사용됨")

pub mod normalize;
pub mod qr;
pub mod redeem;
