use serde::{Deserialize, Serialize};

use super::ratios::{RatioKind, RatioSet};
use super::targets::TargetProfile;

/// 편차(%) 표시 정밀도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPrecision {
    /// 정수 반올림
    #[default]
    Whole,
    /// 소수 첫째 자리
    OneDecimal,
    /// 반올림 없음
    Full,
}

impl DisplayPrecision {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            DisplayPrecision::Whole => value.round(),
            DisplayPrecision::OneDecimal => (value * 10.0).round() / 10.0,
            DisplayPrecision::Full => value,
        }
    }
}

/// 몰비 하나의 목표 대비 편차.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationRow {
    pub ratio: RatioKind,
    pub value: Option<f64>,
    pub target: f64,
    /// |값-목표|/목표 × 100. 값이 정의되지 않았거나 목표가 0이면 `None`.
    pub percent: Option<f64>,
}

/// 목표 프로파일에 있는 몰비들의 편차 표.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationTable {
    pub rows: Vec<DeviationRow>,
}

impl DeviationTable {
    pub fn get(&self, ratio: RatioKind) -> Option<&DeviationRow> {
        self.rows.iter().find(|r| r.ratio == ratio)
    }

    /// 편차가 `limit_pct`를 넘는 몰비 개수. 정의되지 않은 편차도 초과로 센다.
    pub fn count_exceeding(&self, limit_pct: f64) -> usize {
        self.rows
            .iter()
            .filter(|r| r.percent.map_or(true, |p| p > limit_pct))
            .count()
    }
}

/// 절대 편차율[%]. 목표가 0이면 정의되지 않는다.
pub fn percent_deviation(value: f64, target: f64) -> Option<f64> {
    (target != 0.0).then(|| (value - target).abs() / target * 100.0)
}

/// 계산된 몰비를 목표 프로파일과 비교한다.
pub fn compute_deviation(
    ratios: &RatioSet,
    targets: &TargetProfile,
    precision: DisplayPrecision,
) -> DeviationTable {
    let rows = targets
        .iter()
        .map(|(ratio, target)| {
            let value = ratios.get(ratio);
            let percent = value
                .and_then(|v| percent_deviation(v, target))
                .map(|p| precision.apply(p));
            DeviationRow {
                ratio,
                value,
                target,
                percent,
            }
        })
        .collect();
    DeviationTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_modes() {
        assert_eq!(DisplayPrecision::Whole.apply(12.46), 12.0);
        assert_eq!(DisplayPrecision::OneDecimal.apply(12.46), 12.5);
        assert_eq!(DisplayPrecision::Full.apply(12.46), 12.46);
    }

    #[test]
    fn zero_target_is_undefined() {
        assert_eq!(percent_deviation(1.0, 0.0), None);
    }
}
