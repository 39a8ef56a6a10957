//! 인메모리 차트 표면.
//!
//! 마지막으로 적용된 옵션을 마운트별로 보관한다. 로컬 웹 API가 이 값을
//! 그대로 내보내고, 테스트에서는 적용 결과 확인에 쓴다.

use idsdash_core::error::CoreError;
use idsdash_core::models::chart::ChartOption;
use idsdash_core::ports::chart_surface::{ChartHost, ChartSurface};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 마운트 하나에 바인딩된 인메모리 표면
#[derive(Debug)]
pub struct MemorySurface {
    mount: String,
    option: RwLock<Option<ChartOption>>,
    apply_count: AtomicU64,
}

impl MemorySurface {
    fn new(mount: &str) -> Self {
        Self {
            mount: mount.to_string(),
            option: RwLock::new(None),
            apply_count: AtomicU64::new(0),
        }
    }

    /// 현재 옵션 (아직 적용 전이면 None)
    pub fn current(&self) -> Option<ChartOption> {
        self.option.read().clone()
    }

    /// `set_option` 호출 횟수
    pub fn apply_count(&self) -> u64 {
        self.apply_count.load(Ordering::Relaxed)
    }
}

impl ChartSurface for MemorySurface {
    fn mount(&self) -> &str {
        &self.mount
    }

    fn set_option(&self, option: &ChartOption) -> Result<(), CoreError> {
        *self.option.write() = Some(option.clone());
        let count = self.apply_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "차트 옵션 적용: mount={}, points={}, 누적 {}회",
            self.mount,
            option.point_count(),
            count
        );
        Ok(())
    }
}

/// 인메모리 차트 호스트 - `ChartHost` 포트 구현
///
/// 생성 시 등록한 마운트만 존재한다. 같은 마운트에 대한 `init`은
/// 항상 같은 표면을 돌려준다.
#[derive(Debug, Default)]
pub struct MemoryChartHost {
    mounts: BTreeSet<String>,
    surfaces: Mutex<HashMap<String, Arc<MemorySurface>>>,
}

impl MemoryChartHost {
    /// 마운트 목록으로 호스트 생성
    pub fn new<I, S>(mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mounts: mounts.into_iter().map(Into::into).collect(),
            surfaces: Mutex::new(HashMap::new()),
        }
    }

    /// 등록된 마운트 목록
    pub fn mounts(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(String::as_str)
    }

    /// 마운트가 등록되어 있는지 여부
    pub fn has_mount(&self, mount: &str) -> bool {
        self.mounts.contains(mount)
    }

    /// 마운트의 현재 옵션
    pub fn current(&self, mount: &str) -> Option<ChartOption> {
        self.surfaces.lock().get(mount).and_then(|s| s.current())
    }

    /// 마운트의 적용 횟수 (init 전이면 0)
    pub fn apply_count(&self, mount: &str) -> u64 {
        self.surfaces
            .lock()
            .get(mount)
            .map(|s| s.apply_count())
            .unwrap_or(0)
    }

    /// 옵션이 적용된 모든 마운트의 스냅샷
    pub fn snapshot(&self) -> BTreeMap<String, ChartOption> {
        self.surfaces
            .lock()
            .iter()
            .filter_map(|(mount, surface)| surface.current().map(|o| (mount.clone(), o)))
            .collect()
    }
}

impl ChartHost for MemoryChartHost {
    fn init(&self, mount: &str) -> Result<Arc<dyn ChartSurface>, CoreError> {
        if !self.mounts.contains(mount) {
            return Err(CoreError::MountPointNotFound {
                mount: mount.to_string(),
            });
        }

        let mut surfaces = self.surfaces.lock();
        let surface = surfaces
            .entry(mount.to_string())
            .or_insert_with(|| {
                debug!("인메모리 차트 표면 생성: {mount}");
                Arc::new(MemorySurface::new(mount))
            })
            .clone();
        Ok(surface as Arc<dyn ChartSurface>)
    }
}
