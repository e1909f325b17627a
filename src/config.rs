//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `PUBLIC_URL`: 스캔 URL에 들어가는 외부 공개 주소 (배포 도메인)
//! - `SCAN_COUNTS_PATH`: 스캔 카운트 JSON 파일 경로

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;

// #[derive(...)]: 자동으로 트레이트 구현을 생성하는 **derive 매크로**
// - Debug: {:?} 포맷으로 출력 가능 (디버깅용 문자열 표현)
// - Clone: .clone() 메서드로 값을 복제 가능
#[derive(Debug, Clone)]
/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
pub struct Config {
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
    /// QR 코드에 인코딩되는 스캔 URL의 베이스 주소
    /// (예: "https://qroffer.example.com" — 뒤에 /scan-qr?code=... 가 붙습니다)
    /// 바인딩 주소와 별개인 이유: 배포 환경에서는 리버스 프록시 뒤에서 동작하므로
    /// 외부에 공개되는 도메인과 실제 바인딩 주소가 다릅니다.
    pub public_url: String,
    /// 스캔 카운트가 저장되는 JSON 파일 경로 (기본값: "data/scan_counts.json")
    pub scan_counts_path: String,
}

// impl: 구조체에 메서드를 추가하는 블록
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 설정에 기본값이 있으므로 이 함수는 실패하지 않습니다.
    /// (필수 환경변수가 없는 서비스 — DB 주소도, 비밀키도 필요 없습니다)
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        // 포트 번호는 문자열 → 숫자 변환이 필요합니다.
        // .parse(): 문자열을 다른 타입으로 파싱. 여기서는 u16으로 변환합니다.
        // .unwrap_or(3000): 파싱 실패 시 기본값 3000 사용
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()        // "3000" → 3000u16
            .unwrap_or(3000); // 파싱 실패 시 기본값

        Self {
            // unwrap_or_else(|_| ...): Result가 Err일 때 실행할 클로저(익명 함수)를 지정합니다.
            // |_|: 클로저의 매개변수. `_`는 "이 값은 사용하지 않겠다"는 의미입니다.
            // PUBLIC_URL이 없으면 로컬 개발용으로 바인딩 포트 기준 주소를 만듭니다.
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            scan_counts_path: env::var("SCAN_COUNTS_PATH")
                .unwrap_or_else(|_| "data/scan_counts.json".to_string()),
            host,
            port,
        }
    }
}
