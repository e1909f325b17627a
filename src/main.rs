//! # QrOffer 웹 서버 진입점
//!
//! 이 파일은 QrOffer 애플리케이션의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! QrOffer는 전화번호별로 쿠폰 리딤 URL을 담은 QR 코드를 발급하고,
//! 각 코드가 이미 사용되었는지(리딤 여부)를 스캔 횟수 파일로 추적하는
//! 작은 HTTP 서비스입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 스캔 카운트 파일을 담을 데이터 디렉토리 생성
//! 4. 스캔 카운트 저장소 로딩 (파일이 손상되었으면 기동 실패)
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod error;
mod models;
mod routes;
mod services;
mod store;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
// `use` 키워드는 다른 모듈의 항목을 현재 스코프로 가져옵니다.
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    // Axum: Rust의 비동기 웹 프레임워크. Express.js와 비슷한 역할
    http::{header, Method},   // CORS 설정에 쓰는 HTTP 메서드/헤더 상수
    routing::{get, post},     // HTTP 메서드별 라우팅 함수들
    Router,                   // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use config::Config; // 우리가 만든 설정 모듈
use routes::{qr::AppState, *}; // `*`는 모듈의 모든 공개 항목을 가져옴 (glob import)
use std::{path::Path, sync::Arc}; // 파일 경로 타입, 참조 카운트 스마트 포인터
use store::ScanStore; // 스캔 카운트 저장소
use tower_http::{
    // tower-http: HTTP 미들웨어 모음 크레이트
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: 비동기 런타임을 시작하는 **어트리뷰트 매크로**
// Rust의 main() 함수는 기본적으로 동기(sync)이므로,
// async/await를 사용하려면 비동기 런타임(Tokio)이 필요합니다.
// 이 매크로가 내부적으로 tokio 런타임을 생성하고 main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일에서 환경변수를 읽어옵니다. (예: PORT, PUBLIC_URL 등)
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // tracing은 Rust 생태계의 표준 로깅 프레임워크입니다.
    // registry(): 로그 수집기를 만들고
    // .with(): 필터와 포맷터를 레이어처럼 쌓아올립니다 (데코레이터 패턴)
    tracing_subscriber::registry()
        .with(
            // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
            // 환경변수가 없으면 기본값으로 qroffer, tower_http, axum 모듈을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qroffer=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // Config::from_env()로 환경변수에서 설정을 읽어옵니다.
    // 모든 설정에 기본값이 있어, 환경변수 없이도 바로 기동합니다.
    let config = Config::from_env();
    tracing::info!("Starting QrOffer server on {}:{}", config.host, config.port);

    // ── 4단계: 데이터 디렉토리 생성 ──
    // 스캔 카운트 파일을 담을 디렉토리가 없으면 생성합니다.
    // .parent(): 파일 경로에서 디렉토리 부분만 추출 (예: "data/scan_counts.json" → "data")
    if let Some(data_dir) = Path::new(&config.scan_counts_path).parent() {
        if !data_dir.exists() {
            // tokio::fs: 비동기 파일 시스템 작업. std::fs의 비동기 버전입니다.
            // create_dir_all: 중간 디렉토리까지 모두 생성 (mkdir -p와 같음)
            tokio::fs::create_dir_all(data_dir).await?;
            tracing::info!("Created data directory: {}", data_dir.display());
        }
    }

    // ── 5단계: 스캔 카운트 저장소 로딩 ──
    // 이전 실행에서 저장해 둔 스캔 카운트 파일을 메모리로 읽어옵니다.
    // 파일이 없으면 빈 상태로 시작하고,
    // 파일이 있는데 JSON 매핑으로 파싱되지 않으면 기동 자체를 실패시킵니다.
    // (손상된 상태로 카운트를 덮어쓰는 것보다 즉시 멈추는 편이 안전합니다)
    let store = ScanStore::load(&config.scan_counts_path).await?;
    tracing::info!("Loaded scan counts from {}", config.scan_counts_path);

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // AppState: 모든 라우트 핸들러가 공유하는 데이터를 담는 구조체
    // Axum에서는 State를 통해 핸들러에 의존성을 주입합니다.
    // Arc(참조 카운트 스마트 포인터)로 감싸면 clone해도 저장소가 복제되지 않고
    // 모든 핸들러가 같은 저장소를 가리킵니다.
    let state = AppState {
        store: Arc::new(store),
        public_url: config.public_url.clone(),
    };

    // ── 7단계: API 라우터 설정 ──
    // Router::new(): 빈 라우터를 생성합니다.
    // .route(): URL 패턴과 핸들러 함수를 연결합니다.
    //           get(), post()는 HTTP 메서드를 지정합니다.
    // 외부 계약(QR 코드에 인쇄되어 이미 배포된 URL)이 루트 경로를 쓰므로
    // /api/v1 같은 접두사 없이 루트에 바로 마운트합니다.
    let app = Router::new()
        // QR 코드 일괄 발급 API
        .route("/generate-qr", post(routes::qr::generate_qr))
        // QR 스캔 리다이렉트 대상 — 스캔 시 브라우저가 여는 GET 엔드포인트
        .route("/scan-qr", get(routes::scan::scan_qr))
        // 리딤 여부 확인 API (POST 본문으로 코드 전달)
        .route("/check-scan", post(routes::scan::check_scan))
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(health_check))
        // .with_state(): 이 라우터의 모든 핸들러에서 AppState를 사용할 수 있게 합니다.
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // CORS: 브라우저의 보안 정책. 다른 도메인에서의 API 호출을 허용/차단합니다.
    // QR 발급 화면이 별도 도메인에서 서빙되므로 출처(origin)는 모두 허용하되,
    // 이 서비스가 실제로 쓰는 메서드/헤더만 명시적으로 엽니다.
    let cors = CorsLayer::new()
        .allow_origin(Any) // 모든 출처(origin) 허용
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // .layer(): 미들웨어를 추가합니다. 미들웨어는 요청/응답을 가로채서 처리합니다.
    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // ── 9단계: 서버 시작 ──
    // format!: 문자열 포맷팅 매크로. Python의 f-string과 비슷합니다.
    let addr = format!("{}:{}", config.host, config.port);
    // TcpListener: TCP 연결을 수신 대기하는 소켓
    // .bind(): 지정된 주소에 바인딩 (해당 포트에서 요청 대기 시작)
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): Axum 서버를 시작하고 요청을 처리합니다.
    // 이 줄에서 서버가 영원히 실행됩니다 (Ctrl+C로 종료할 때까지).
    axum::serve(listener, app).await?;

    // Ok(()): 성공을 나타내는 Result 값. ()는 "빈 값"(unit 타입)입니다.
    Ok(())
}
