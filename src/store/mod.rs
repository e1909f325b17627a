//! # 스캔 카운트 저장소 (Scan Count Store)
//!
//! 정규화된 식별자 → 누적 스캔 횟수 매핑을 관리하는 영속 저장소입니다.
//! 라우트 핸들러(routes/)와 리딤 서비스(services/redeem.rs)가
//! 이 모듈을 통해 상태를 읽고 씁니다.
//!
//! ## 저장 방식
//! - 매핑 전체를 기동 시 JSON 파일에서 한 번 메모리로 로딩합니다.
//! - 변경이 생길 때마다 매핑 **전체**를 같은 파일에 다시 써서 영속화합니다.
//!   (증분 저장/배치 없음 — 이 규모에서는 파일 하나를 통째로 쓰는 것이 가장 단순합니다)
//! - 항목은 처음 참조될 때 0으로 생성되며, 삭제되지 않습니다.
//!
//! ## 동시성
//! 매핑은 `tokio::sync::Mutex`로 보호됩니다. 잠금은 "메모리 갱신 + 파일 쓰기"
//! 전 구간 동안 유지되므로, 같은 식별자에 대한 동시 스캔 확인이
//! 읽기-증가-쓰기 순서를 서로 끼어들며 섞는 일은 없습니다.
//! (std가 아닌 tokio의 Mutex를 쓰는 이유: 비동기 파일 쓰기를 기다리는 동안
//! 잠금을 계속 들고 있어야 하는데, std Mutex는 await 지점을 넘어 들고 있을 수
//! 없기 때문입니다)

use crate::error::AppError;
// BTreeMap: 키 순서가 정렬된 맵. 직렬화 결과가 항상 같은 순서로 나오므로
// 저장 파일이 결정적(deterministic)으로 생성됩니다.
use std::collections::BTreeMap;
// Path: 파일 경로를 나타내는 불변 참조 타입 (&str과 비슷한 역할)
// PathBuf: 소유된 파일 경로 타입 (String과 비슷한 역할)
use std::path::{Path, PathBuf};
// tokio::fs: 비동기 파일 시스템 모듈
// 일반 std::fs는 동기(블로킹)이므로, 비동기 서버에서는 tokio::fs를 사용해야 합니다.
use tokio::fs;
// tokio::sync::Mutex: async 환경용 상호 배제 잠금
use tokio::sync::Mutex;

/// 식별자별 스캔 카운트를 관리하는 영속 저장소
///
/// 서버 기동 시 `load()`로 한 번 생성되어 `Arc`로 감싸진 뒤
/// 모든 요청 핸들러가 공유합니다. 전역 변수 대신 소유된 객체를
/// 핸들러에 주입하는 구조라서, 테스트에서는 임시 파일 경로로
/// 독립된 저장소를 만들어 쓸 수 있습니다.
pub struct ScanStore {
    /// 스캔 카운트 JSON 파일 경로
    path: PathBuf,
    /// 메모리 상의 매핑 — 파일 내용과 (마지막 flush 직후 기준) 일치합니다.
    counts: Mutex<BTreeMap<String, u64>>,
}

impl ScanStore {
    /// 파일에서 스캔 카운트를 읽어 저장소를 생성합니다.
    ///
    /// # 동작
    /// - 파일이 없으면: 빈 매핑으로 시작합니다 (첫 실행).
    /// - 파일이 있으면: JSON 객체(식별자 → 횟수)로 파싱합니다.
    /// - 파일이 있는데 파싱에 실패하면: `AppError::Corrupt`를 반환합니다.
    ///   호출자(main)는 이를 기동 실패로 처리해야 합니다 — 손상된 상태 위에
    ///   새 카운트를 덮어쓰면 기존 리딤 기록을 잃기 때문입니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        // fs::read_to_string(): 파일 전체를 UTF-8 문자열로 읽습니다 (비동기)
        let counts = match fs::read_to_string(&path).await {
            Ok(raw) => {
                // 파싱 실패는 IO 에러와 구분되는 별도 variant로 보고합니다.
                // map_err(): Result의 에러 타입을 다른 타입으로 변환하는 콤비네이터
                serde_json::from_str(&raw).map_err(|e| {
                    AppError::Corrupt(format!("{}: {}", path.display(), e))
                })?
            }
            // ErrorKind::NotFound: 파일 없음 — 에러가 아니라 "아직 저장된 것이 없음"
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            // 그 밖의 IO 에러(권한 등)는 그대로 전파합니다.
            // .into(): std::io::Error → AppError::Io (#[from] 변환)
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            counts: Mutex::new(counts),
        })
    }

    /// 식별자가 없으면 스캔 횟수 0으로 생성합니다. 멱등(idempotent) 연산입니다.
    ///
    /// 이미 있는 식별자의 횟수는 절대 바꾸지 않습니다.
    /// 생성 여부와 무관하게 매핑 전체를 파일에 다시 씁니다.
    pub async fn ensure(&self, code: &str) -> Result<(), AppError> {
        // .lock().await: 잠금을 얻을 때까지 비동기로 대기
        let mut counts = self.counts.lock().await;
        // entry().or_insert(): 키가 없으면 기본값을 넣고, 있으면 그대로 둡니다.
        counts.entry(code.to_string()).or_insert(0);
        self.persist(&counts).await
    }

    /// 여러 식별자를 한 번에 생성하고 파일은 한 번만 씁니다.
    ///
    /// QR 일괄 발급에서 사용합니다 — 식별자마다 파일을 다시 쓰는 대신
    /// 배치 전체에 대해 flush를 한 번으로 줄입니다.
    /// 새로 생긴 항목이 없어도 파일은 항상 다시 씁니다.
    pub async fn ensure_all(&self, codes: &[String]) -> Result<(), AppError> {
        let mut counts = self.counts.lock().await;
        for code in codes {
            counts.entry(code.clone()).or_insert(0);
        }
        self.persist(&counts).await
    }

    /// 식별자의 현재 스캔 횟수를 반환합니다. 없는 식별자는 0입니다.
    ///
    /// 읽기 전용: 없는 식별자를 조회해도 항목이 생기지 않습니다.
    /// (항목 생성은 리딤 흐름이 명시적으로 `ensure`/`record_scan`을 부를 때만)
    pub async fn get(&self, code: &str) -> u64 {
        // .copied(): Option<&u64> → Option<u64> (u64는 Copy 타입이므로 복사)
        self.counts.lock().await.get(code).copied().unwrap_or(0)
    }

    /// 스캔 1회를 기록하고 갱신된 횟수를 반환합니다.
    ///
    /// # 동작 (한 번의 잠금 안에서)
    /// 1. 식별자가 없으면 0으로 생성
    /// 2. 횟수를 정확히 1 증가
    /// 3. 매핑 전체를 파일에 동기적으로 다시 쓰기 (응답 전에 완료)
    ///
    /// 횟수는 리딤 성공 여부와 무관하게 모든 확인 시도마다 증가합니다 —
    /// "성공한 리딤 수"가 아니라 "총 스캔 시도 수"를 추적하는 값입니다.
    pub async fn record_scan(&self, code: &str) -> Result<u64, AppError> {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(code.to_string()).or_insert(0);
        *count += 1;
        // *count: 가변 참조를 역참조하여 값을 복사해 둡니다.
        // (persist가 counts를 다시 빌려야 하므로 참조를 먼저 끊습니다)
        let updated = *count;
        self.persist(&counts).await?;
        Ok(updated)
    }

    /// 매핑 전체를 JSON 파일로 직렬화합니다. (호출자가 잠금을 쥔 상태에서 호출)
    ///
    /// 보기 좋게 들여쓰기된 JSON으로 저장합니다 — 운영 중에 파일을 열어
    /// 카운트를 눈으로 확인하는 용도를 겸합니다.
    async fn persist(&self, counts: &BTreeMap<String, u64>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(counts)?;
        // fs::write(): 파일에 내용을 씁니다 (파일이 있으면 덮어쓰기, 없으면 새로 생성)
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

// ── 테스트 ──
// #[cfg(test)]: 이 모듈은 `cargo test`에서만 컴파일됩니다.
#[cfg(test)]
mod tests {
    use super::*;

    /// 임시 디렉토리 안의 저장 파일 경로를 만들어 줍니다.
    /// TempDir가 드롭되면 디렉토리와 파일이 함께 삭제됩니다.
    fn temp_store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("scan_counts.json")
    }

    // #[tokio::test]: 비동기 테스트를 위한 매크로.
    // 테스트 본문에서 .await를 쓸 수 있게 런타임을 만들어 줍니다.
    #[tokio::test]
    async fn load_starts_empty_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::load(temp_store_path(&dir)).await.unwrap();

        // 파일이 없으면 빈 상태 — 아무 식별자나 조회해도 0
        assert_eq!(store.get("5551234").await, 0);
    }

    #[tokio::test]
    async fn load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);
        // JSON 매핑이 아닌 내용을 미리 써 둡니다.
        std::fs::write(&path, "not json at all").unwrap();

        let result = ScanStore::load(&path).await;
        // matches!: 값이 주어진 패턴과 일치하는지 검사하는 매크로
        assert!(matches!(result, Err(AppError::Corrupt(_))));
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::load(temp_store_path(&dir)).await.unwrap();

        store.ensure("5551234").await.unwrap();
        assert_eq!(store.get("5551234").await, 0);

        // 이미 스캔된 식별자에 ensure를 다시 불러도 횟수가 보존되어야 합니다.
        store.record_scan("5551234").await.unwrap();
        store.ensure("5551234").await.unwrap();
        assert_eq!(store.get("5551234").await, 1);
    }

    #[tokio::test]
    async fn get_does_not_create_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);
        let store = ScanStore::load(&path).await.unwrap();

        assert_eq!(store.get("ghost").await, 0);
        // 조회만으로는 아무것도 영속화되지 않습니다.
        store.ensure("real").await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let saved: BTreeMap<String, u64> = serde_json::from_str(&raw).unwrap();
        assert!(!saved.contains_key("ghost"));
        assert_eq!(saved.get("real"), Some(&0));
    }

    #[tokio::test]
    async fn record_scan_increments_by_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::load(temp_store_path(&dir)).await.unwrap();

        // 없던 식별자도 record_scan 한 번으로 1이 됩니다 (0 생성 + 1 증가).
        assert_eq!(store.record_scan("5551234").await.unwrap(), 1);
        assert_eq!(store.record_scan("5551234").await.unwrap(), 2);
        assert_eq!(store.record_scan("5551234").await.unwrap(), 3);
        // 횟수는 단조 증가 — 다른 식별자의 기록에 영향받지 않습니다.
        store.record_scan("other").await.unwrap();
        assert_eq!(store.get("5551234").await, 3);
    }

    #[tokio::test]
    async fn ensure_all_flushes_once_and_keeps_existing_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);
        let store = ScanStore::load(&path).await.unwrap();

        store.record_scan("5551234").await.unwrap();
        store
            .ensure_all(&["5551234".to_string(), "5559999".to_string()])
            .await
            .unwrap();

        // 기존 카운트는 보존, 새 식별자는 0으로 생성
        assert_eq!(store.get("5551234").await, 1);
        assert_eq!(store.get("5559999").await, 0);
    }

    #[tokio::test]
    async fn persisted_state_round_trips_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);

        // 첫 번째 "프로세스": 몇 건 기록
        {
            let store = ScanStore::load(&path).await.unwrap();
            store.record_scan("5551234").await.unwrap();
            store.record_scan("5551234").await.unwrap();
            store.ensure("5550000").await.unwrap();
        }

        // 두 번째 "프로세스": 같은 파일에서 다시 로딩하면
        // 마지막 변경 직후의 매핑이 그대로 복원되어야 합니다.
        let reloaded = ScanStore::load(&path).await.unwrap();
        assert_eq!(reloaded.get("5551234").await, 2);
        assert_eq!(reloaded.get("5550000").await, 0);
        assert_eq!(reloaded.get("never-seen").await, 0);
    }
}
