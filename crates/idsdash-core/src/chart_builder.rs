//! 페이로드 → 차트 옵션 변환.
//!
//! 추세 라인 차트와 공격 유형 파이 차트 옵션을 만든다. 결과는 항상
//! 완전한 옵션이며, 적용 시 이전 옵션을 통째로 교체한다.

use serde_json::Value;
use tracing::warn;

use crate::config::{ChartConfig, PieValidation};
use crate::models::chart::{Axis, AxisType, ChartOption, Series, Tooltip, TooltipTrigger};
use crate::models::payload::{MetricsPayload, PieEntry, TrendSeries};

/// 한 주기에서 만들어지는 두 차트 옵션
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub trend: ChartOption,
    pub pie: ChartOption,
}

/// 페이로드에서 두 차트 옵션을 만든다
pub fn build_dashboard(payload: &MetricsPayload, style: &ChartConfig) -> DashboardOptions {
    let series = payload.trend_series();
    let pie = filter_pie_entries(&payload.pie, style.pie_validation);
    DashboardOptions {
        trend: trend_option(&series, style),
        pie: pie_option(&pie, style),
    }
}

/// 추세 라인 차트 옵션
pub fn trend_option(series: &TrendSeries, style: &ChartConfig) -> ChartOption {
    ChartOption {
        tooltip: Tooltip {
            trigger: TooltipTrigger::Axis,
        },
        x_axis: Some(Axis {
            axis_type: AxisType::Category,
            name: None,
            data: Some(series.categories.clone()),
        }),
        y_axis: Some(Axis {
            axis_type: AxisType::Value,
            name: Some(style.value_axis_name.clone()),
            data: None,
        }),
        series: vec![Series::Line {
            data: series.values.clone(),
            smooth: true,
        }],
    }
}

/// 파이 차트 옵션
pub fn pie_option(entries: &[PieEntry], style: &ChartConfig) -> ChartOption {
    ChartOption {
        tooltip: Tooltip {
            trigger: TooltipTrigger::Item,
        },
        x_axis: None,
        y_axis: None,
        series: vec![Series::Pie {
            radius: style.pie_radius.clone(),
            data: entries.to_vec(),
        }],
    }
}

/// 검증 정책에 따라 파이 항목 선별
pub fn filter_pie_entries(entries: &[PieEntry], policy: PieValidation) -> Vec<PieEntry> {
    match policy {
        PieValidation::PassThrough => entries.to_vec(),
        PieValidation::Strict => entries
            .iter()
            .filter(|entry| {
                let ok = is_valid_pie_entry(entry);
                if !ok {
                    warn!(
                        "파이 항목 제외: name={}, value={}",
                        entry.name, entry.value
                    );
                }
                ok
            })
            .cloned()
            .collect(),
    }
}

/// 이름이 비어 있지 않은 문자열이고 값이 음이 아닌 숫자인 항목
fn is_valid_pie_entry(entry: &PieEntry) -> bool {
    let named = entry
        .name
        .as_str()
        .is_some_and(|name| !name.trim().is_empty());
    named && is_non_negative(&entry.value)
}

fn is_non_negative(value: &Value) -> bool {
    value
        .as_f64()
        .map(|v| v.is_finite() && v >= 0.0)
        .unwrap_or(false)
}
