use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ratios::{RatioKind, RatioSet};

/// 목표 몰비 프로파일 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetError {
    /// 알 수 없는 몰비 이름
    UnknownRatio(String),
    /// 음수 또는 NaN 목표값
    InvalidValue { ratio: RatioKind, value: f64 },
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetError::UnknownRatio(name) => write!(f, "알 수 없는 몰비: {name}"),
            TargetError::InvalidValue { ratio, value } => {
                write!(f, "{ratio} 목표값 {value}은(는) 0 이상의 유한한 값이어야 합니다.")
            }
        }
    }
}

impl std::error::Error for TargetError {}

/// 문헌 기반 목표 몰비 묶음. 한 번의 계산 동안 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct TargetProfile {
    targets: BTreeMap<RatioKind, f64>,
}

impl TargetProfile {
    pub fn new<I>(pairs: I) -> Result<Self, TargetError>
    where
        I: IntoIterator<Item = (RatioKind, f64)>,
    {
        let mut targets = BTreeMap::new();
        for (ratio, value) in pairs {
            if !value.is_finite() || value < 0.0 {
                return Err(TargetError::InvalidValue { ratio, value });
            }
            targets.insert(ratio, value);
        }
        Ok(Self { targets })
    }

    /// 문헌값 프리셋 (하이브리드 MK+GGBFS 배합 기준).
    pub fn literature() -> Self {
        Self {
            targets: BTreeMap::from([
                (RatioKind::SiAl, 3.0),
                (RatioKind::NaAl, 0.9),
                (RatioKind::SiO2Na2O, 1.75),
                (RatioKind::H2ONa2O, 12.5),
                (RatioKind::H2OSiO2, 0.225),
                (RatioKind::CaSi, 0.8),
                (RatioKind::CaNaAl, 1.5),
            ]),
        }
    }

    /// 실험실 배합의 몰비를 기준 프로파일로 삼는다. 정의되지 않은 몰비는 제외한다.
    pub fn from_ratios(ratios: &RatioSet) -> Self {
        Self {
            targets: ratios
                .iter()
                .filter_map(|(k, v)| v.filter(|x| x.is_finite() && *x >= 0.0).map(|x| (k, x)))
                .collect(),
        }
    }

    pub fn get(&self, ratio: RatioKind) -> Option<f64> {
        self.targets.get(&ratio).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatioKind, f64)> + '_ {
        self.targets.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::literature()
    }
}

impl TryFrom<BTreeMap<String, f64>> for TargetProfile {
    type Error = TargetError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut pairs = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let ratio = RatioKind::from_label(&key).ok_or(TargetError::UnknownRatio(key))?;
            pairs.push((ratio, value));
        }
        Self::new(pairs)
    }
}

impl From<TargetProfile> for BTreeMap<String, f64> {
    fn from(value: TargetProfile) -> Self {
        value
            .targets
            .into_iter()
            .map(|(k, v)| (k.label().to_string(), v))
            .collect()
    }
}
