//! 팬아웃 차트 호스트.
//!
//! 여러 호스트의 같은 마운트를 하나의 표면으로 묶는다. 예: 웹 API용
//! 인메모리 표면 + 파일 출력 표면.

use idsdash_core::error::CoreError;
use idsdash_core::models::chart::ChartOption;
use idsdash_core::ports::chart_surface::{ChartHost, ChartSurface};
use std::sync::Arc;

/// 하위 표면 전체에 옵션을 적용하는 표면
pub struct FanOutSurface {
    mount: String,
    targets: Vec<Arc<dyn ChartSurface>>,
}

impl ChartSurface for FanOutSurface {
    fn mount(&self) -> &str {
        &self.mount
    }

    /// 모든 하위 표면에 적용 시도 후 첫 에러 반환
    fn set_option(&self, option: &ChartOption) -> Result<(), CoreError> {
        let mut first_error = None;
        for target in &self.targets {
            if let Err(e) = target.set_option(option) {
                tracing::warn!("차트 옵션 적용 실패: mount={}, {e}", target.mount());
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// 팬아웃 차트 호스트 - `ChartHost` 포트 구현
#[derive(Default)]
pub struct FanOutChartHost {
    hosts: Vec<Arc<dyn ChartHost>>,
}

impl FanOutChartHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 하위 호스트 추가
    pub fn with_host(mut self, host: Arc<dyn ChartHost>) -> Self {
        self.hosts.push(host);
        self
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl ChartHost for FanOutChartHost {
    /// 하위 호스트 중 하나라도 마운트가 없으면 실패
    fn init(&self, mount: &str) -> Result<Arc<dyn ChartSurface>, CoreError> {
        if self.hosts.is_empty() {
            return Err(CoreError::MountPointNotFound {
                mount: mount.to_string(),
            });
        }

        let targets = self
            .hosts
            .iter()
            .map(|host| host.init(mount))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Arc::new(FanOutSurface {
            mount: mount.to_string(),
            targets,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_file::JsonFileChartHost;
    use crate::memory::MemoryChartHost;
    use idsdash_core::chart_builder::pie_option;
    use idsdash_core::config::ChartConfig;
    use idsdash_core::models::payload::PieEntry;
    use tempfile::TempDir;

    #[test]
    fn applies_to_every_host() {
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(MemoryChartHost::new(["pie"]));
        let files = Arc::new(JsonFileChartHost::new(dir.path()));
        let host = FanOutChartHost::new()
            .with_host(memory.clone())
            .with_host(files.clone());

        let option = pie_option(&[PieEntry::new("U2R", 7u64)], &ChartConfig::default());
        host.init("pie").unwrap().set_option(&option).unwrap();

        assert_eq!(memory.current("pie"), Some(option));
        assert!(files.option_path("pie").exists());
    }

    #[test]
    fn missing_mount_in_any_host_fails() {
        let memory = Arc::new(MemoryChartHost::new(["trend"]));
        let host = FanOutChartHost::new().with_host(memory);
        assert!(host.init("pie").is_err());
        assert!(FanOutChartHost::new().init("trend").is_err());
    }
}
