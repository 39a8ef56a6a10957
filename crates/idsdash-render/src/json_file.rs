//! JSON 파일 차트 표면.
//!
//! 출력 디렉토리가 마운트 지점이다. `set_option`마다 `<dir>/<mount>.json`을
//! 임시 파일 + rename으로 교체하므로 읽는 쪽은 항상 완전한 옵션만 본다.

use idsdash_core::error::CoreError;
use idsdash_core::models::chart::ChartOption;
use idsdash_core::ports::chart_surface::{ChartHost, ChartSurface};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 옵션 파일 확장자
const OPTION_FILE_EXT: &str = "json";

/// 파일 하나에 바인딩된 차트 표면
#[derive(Debug)]
pub struct JsonFileSurface {
    mount: String,
    path: PathBuf,
}

impl JsonFileSurface {
    /// 옵션 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSurface for JsonFileSurface {
    fn mount(&self) -> &str {
        &self.mount
    }

    fn set_option(&self, option: &ChartOption) -> Result<(), CoreError> {
        let content = serde_json::to_vec_pretty(option)?;
        let tmp_path = self.path.with_extension(format!("{OPTION_FILE_EXT}.tmp"));

        let replaced = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = replaced {
            // 실패한 교체의 임시 파일은 남기지 않음
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!("차트 옵션 파일 갱신: {}", self.path.display());
        Ok(())
    }
}

/// JSON 파일 차트 호스트 - `ChartHost` 포트 구현
#[derive(Debug, Clone)]
pub struct JsonFileChartHost {
    dir: PathBuf,
}

impl JsonFileChartHost {
    /// 출력 디렉토리로 호스트 생성 (디렉토리는 `init` 시점에 확인)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 출력 디렉토리
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 마운트의 옵션 파일 경로
    pub fn option_path(&self, mount: &str) -> PathBuf {
        self.dir.join(format!("{mount}.{OPTION_FILE_EXT}"))
    }
}

impl ChartHost for JsonFileChartHost {
    fn init(&self, mount: &str) -> Result<Arc<dyn ChartSurface>, CoreError> {
        let valid_name = !mount.is_empty()
            && mount
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_name || !self.dir.is_dir() {
            return Err(CoreError::MountPointNotFound {
                mount: self.option_path(mount).display().to_string(),
            });
        }

        Ok(Arc::new(JsonFileSurface {
            mount: mount.to_string(),
            path: self.option_path(mount),
        }))
    }
}
