//! 메트릭 엔드포인트 페이로드 및 파생 시계열.
//!
//! `GET /dashboard/api/chart` 응답 본문 구조와, 추세 차트용으로 재구성한
//! [`TrendSeries`]를 정의한다.
//!
//! 라벨과 값은 해석하지 않고 JSON 값 그대로 차트에 넘긴다. 집계 컬럼이
//! 비어 있으면 백엔드는 `null`을 보낼 수 있다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 메트릭 엔드포인트 응답 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsPayload {
    /// 시간 버킷별 이벤트 수 (시간순)
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
    /// 공격 유형별 비중 (파이 차트에 그대로 전달)
    #[serde(default)]
    pub pie: Vec<PieEntry>,
}

impl MetricsPayload {
    /// 추세 시계열 파생
    pub fn trend_series(&self) -> TrendSeries {
        TrendSeries::from_points(&self.trend)
    }

    /// 데이터 포인트가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty() && self.pie.is_empty()
    }
}

/// 시간 버킷 하나의 이벤트 수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 버킷 라벨 (예: "10:05", "2024-05-01 13:00")
    pub time: Value,
    /// 버킷 내 이벤트 수
    pub count: Value,
}

impl TrendPoint {
    pub fn new(time: impl Into<Value>, count: impl Into<Value>) -> Self {
        Self {
            time: time.into(),
            count: count.into(),
        }
    }
}

/// 파이 차트 항목
///
/// 백엔드가 보낸 필드를 그대로 보존한다. `name`/`value` 외의 키
/// (예: `itemStyle`)는 `extra`에 담겨 직렬화 시 원래 위치로 돌아간다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieEntry {
    /// 카테고리 이름 (예: "DoS", 분류되지 않은 경보는 `null`)
    #[serde(default)]
    pub name: Value,
    /// 카테고리 가중치
    #[serde(default)]
    pub value: Value,
    /// 그 밖의 차트 라이브러리 옵션
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PieEntry {
    pub fn new(name: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// 추세 차트용 평행 시퀀스
///
/// `categories[i]`와 `values[i]`는 항상 같은 [`TrendPoint`]에서 나온다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// x축 라벨
    pub categories: Vec<Value>,
    /// y축 값
    pub values: Vec<Value>,
}

impl TrendSeries {
    /// 추세 포인트에서 순서를 유지한 채 라벨/값 시퀀스를 만든다
    pub fn from_points(points: &[TrendPoint]) -> Self {
        let (categories, values) = points
            .iter()
            .map(|p| (p.time.clone(), p.count.clone()))
            .unzip();
        Self { categories, values }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
