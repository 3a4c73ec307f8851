use serde::{Deserialize, Serialize};
use std::fmt;

use super::deviation::{compute_deviation, DisplayPrecision};
use super::ratios::{RatioKind, RatioSet};
use super::targets::TargetProfile;

/// 백화 위험 판정 기준 Na/Al 상한.
pub const NA_AL_LIMIT: f64 = 1.0;
/// 백화 위험 판정 기준 H2O/Na2O 상한.
pub const H2O_NA2O_LIMIT: f64 = 13.0;
/// 이 값 미만이면 너무 건조해 가압 성형이 어렵다.
pub const PRESS_DRY_BELOW: f64 = 0.18;
/// 이 값 초과면 너무 습하다.
pub const PRESS_WET_ABOVE: f64 = 0.26;
/// 편차 개수 방식의 기본 허용 편차[%].
pub const DEFAULT_DEVIATION_LIMIT_PCT: f64 = 10.0;

/// 백화(efflorescence) 위험 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EfflorescenceRisk {
    Low,
    Moderate,
    High,
}

impl fmt::Display for EfflorescenceRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EfflorescenceRisk::Low => "낮음",
            EfflorescenceRisk::Moderate => "보통",
            EfflorescenceRisk::High => "높음",
        };
        f.write_str(label)
    }
}

/// H2O/SiO2 기반 가압 성형성.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pressability {
    /// 너무 건조
    PoorDry,
    /// 적정 (earth-moist)
    Good,
    /// 너무 습함
    ModerateWet,
}

impl fmt::Display for Pressability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Pressability::PoorDry => "불량 (너무 건조)",
            Pressability::Good => "양호 (earth-moist)",
            Pressability::ModerateWet => "보통 (습함)",
        };
        f.write_str(label)
    }
}

/// 물/결합재 질량비 기반 습윤 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoistureClass {
    /// 가압 성형에 적합
    EarthMoist,
    /// 시험 후 사용 가능
    SlightlyMoist,
    /// 가압 성형 부적합
    TooWet,
}

impl fmt::Display for MoistureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoistureClass::EarthMoist => "earth-moist, 가압 성형 적합",
            MoistureClass::SlightlyMoist => "약간 습함, 시험 권장",
            MoistureClass::TooWet => "너무 습함, 가압 성형 부적합",
        };
        f.write_str(label)
    }
}

/// 백화 위험 등급을 나누는 방식.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierStrategy {
    /// Na/Al·H2O/Na2O 상한 기준 2단계 판정
    #[default]
    Threshold,
    /// 목표 대비 편차가 `limit_pct`를 넘는 몰비 개수로 3단계 판정.
    /// 편차는 `precision`으로 반올림한 표시값으로 비교한다.
    DeviationCount {
        #[serde(default = "default_limit_pct")]
        limit_pct: f64,
        #[serde(default)]
        precision: DisplayPrecision,
    },
}

fn default_limit_pct() -> f64 {
    DEFAULT_DEVIATION_LIMIT_PCT
}

/// 위험/작업성 판정 결과. 판정에 필요한 몰비가 정의되지 않으면 해당 항목은 `None`이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub efflorescence: Option<EfflorescenceRisk>,
    pub pressability: Option<Pressability>,
}

pub fn pressability(h2o_sio2: f64) -> Pressability {
    if h2o_sio2 < PRESS_DRY_BELOW {
        Pressability::PoorDry
    } else if h2o_sio2 <= PRESS_WET_ABOVE {
        Pressability::Good
    } else {
        Pressability::ModerateWet
    }
}

pub fn moisture_class(water_binder: f64) -> MoistureClass {
    if water_binder < 0.15 {
        MoistureClass::EarthMoist
    } else if water_binder < 0.25 {
        MoistureClass::SlightlyMoist
    } else {
        MoistureClass::TooWet
    }
}

/// 몰비 집합으로부터 백화 위험과 가압 성형성을 판정한다.
///
/// `targets`는 [`TierStrategy::DeviationCount`]에서만 사용한다.
pub fn classify_risk(
    ratios: &RatioSet,
    tier: TierStrategy,
    targets: &TargetProfile,
) -> RiskAssessment {
    let efflorescence = match tier {
        TierStrategy::Threshold => {
            match (ratios.get(RatioKind::NaAl), ratios.get(RatioKind::H2ONa2O)) {
                (Some(na_al), _) if na_al > NA_AL_LIMIT => Some(EfflorescenceRisk::High),
                (Some(_), Some(h2o_na2o)) if h2o_na2o <= H2O_NA2O_LIMIT => {
                    Some(EfflorescenceRisk::Low)
                }
                (Some(_), Some(_)) => Some(EfflorescenceRisk::High),
                _ => None,
            }
        }
        TierStrategy::DeviationCount {
            limit_pct,
            precision,
        } => {
            let table = compute_deviation(ratios, targets, precision);
            Some(match table.count_exceeding(limit_pct) {
                0 => EfflorescenceRisk::Low,
                1 => EfflorescenceRisk::Moderate,
                _ => EfflorescenceRisk::High,
            })
        }
    };
    RiskAssessment {
        efflorescence,
        pressability: ratios.get(RatioKind::H2OSiO2).map(pressability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressability_bounds_are_inclusive() {
        assert_eq!(pressability(0.1799), Pressability::PoorDry);
        assert_eq!(pressability(0.18), Pressability::Good);
        assert_eq!(pressability(0.26), Pressability::Good);
        assert_eq!(pressability(0.2601), Pressability::ModerateWet);
    }

    #[test]
    fn moisture_bands() {
        assert_eq!(moisture_class(0.10), MoistureClass::EarthMoist);
        assert_eq!(moisture_class(0.15), MoistureClass::SlightlyMoist);
        assert_eq!(moisture_class(0.25), MoistureClass::TooWet);
    }
}
