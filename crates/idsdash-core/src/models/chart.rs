//! 차트 옵션 모델.
//!
//! ECharts `setOption` 인자 형식을 타입으로 표현한다. 직렬화 결과는
//! 차트 라이브러리에 그대로 넘길 수 있는 JSON 객체이다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::PieEntry;

/// 차트 옵션 전체 (부분 패치가 아닌 완전한 교체 단위)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    /// 툴팁 설정
    pub tooltip: Tooltip,
    /// x축 (파이 차트에는 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    /// y축 (파이 차트에는 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    /// 시리즈 목록
    pub series: Vec<Series>,
}

impl ChartOption {
    /// 옵션의 첫 시리즈 데이터 포인트 수
    pub fn point_count(&self) -> usize {
        match self.series.first() {
            Some(Series::Line { data, .. }) => data.len(),
            Some(Series::Pie { data, .. }) => data.len(),
            None => 0,
        }
    }
}

/// 툴팁 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    pub trigger: TooltipTrigger,
}

/// 툴팁 트리거 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    /// 축 기준 (라인 차트)
    Axis,
    /// 항목 기준 (파이 차트)
    Item,
}

/// 축 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    /// 축 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 카테고리 라벨 (카테고리 축 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
}

/// 축 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
}

/// 시리즈 (ECharts `series[].type`으로 구분)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    /// 라인 시리즈
    Line {
        data: Vec<Value>,
        #[serde(default)]
        smooth: bool,
    },
    /// 파이 시리즈
    Pie { radius: String, data: Vec<PieEntry> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_in_echarts_shape() {
        let option = ChartOption {
            tooltip: Tooltip {
                trigger: TooltipTrigger::Axis,
            },
            x_axis: Some(Axis {
                axis_type: AxisType::Category,
                name: None,
                data: Some(vec![json!("10:00")]),
            }),
            y_axis: Some(Axis {
                axis_type: AxisType::Value,
                name: Some("次数".to_string()),
                data: None,
            }),
            series: vec![Series::Line {
                data: vec![json!(3)],
                smooth: true,
            }],
        };

        assert_eq!(
            serde_json::to_value(&option).unwrap(),
            json!({
                "tooltip": {"trigger": "axis"},
                "xAxis": {"type": "category", "data": ["10:00"]},
                "yAxis": {"type": "value", "name": "次数"},
                "series": [{"type": "line", "data": [3], "smooth": true}]
            })
        );
    }

    #[test]
    fn pie_option_omits_axes() {
        let option = ChartOption {
            tooltip: Tooltip {
                trigger: TooltipTrigger::Item,
            },
            x_axis: None,
            y_axis: None,
            series: vec![Series::Pie {
                radius: "60%".to_string(),
                data: vec![PieEntry::new("Probe", 120u64)],
            }],
        };

        let value = serde_json::to_value(&option).unwrap();
        assert!(value.get("xAxis").is_none());
        assert_eq!(value["series"][0]["type"], "pie");
        assert_eq!(option.point_count(), 1);

        let back: ChartOption = serde_json::from_value(value).unwrap();
        assert_eq!(back, option);
    }
}
