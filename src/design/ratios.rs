use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chemistry::MoleTotals;

/// 배합 평가에 쓰는 무차원 몰비.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    #[serde(rename = "Si/Al")]
    SiAl,
    #[serde(rename = "Na/Al")]
    NaAl,
    #[serde(rename = "SiO2/Na2O")]
    SiO2Na2O,
    #[serde(rename = "H2O/Na2O")]
    H2ONa2O,
    #[serde(rename = "H2O/SiO2")]
    H2OSiO2,
    #[serde(rename = "Ca/Si")]
    CaSi,
    #[serde(rename = "(Ca+Na)/Al")]
    CaNaAl,
}

impl RatioKind {
    pub const COUNT: usize = 7;

    pub const ALL: [RatioKind; Self::COUNT] = [
        RatioKind::SiAl,
        RatioKind::NaAl,
        RatioKind::SiO2Na2O,
        RatioKind::H2ONa2O,
        RatioKind::H2OSiO2,
        RatioKind::CaSi,
        RatioKind::CaNaAl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatioKind::SiAl => "Si/Al",
            RatioKind::NaAl => "Na/Al",
            RatioKind::SiO2Na2O => "SiO2/Na2O",
            RatioKind::H2ONa2O => "H2O/Na2O",
            RatioKind::H2OSiO2 => "H2O/SiO2",
            RatioKind::CaSi => "Ca/Si",
            RatioKind::CaNaAl => "(Ca+Na)/Al",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// 해당 몰비가 배합에서 의미하는 바.
    pub fn description(self) -> &'static str {
        match self {
            RatioKind::SiAl => "망상 구조 - 강도와 점성",
            RatioKind::NaAl => "알칼리도 - 용해도와 백화 위험",
            RatioKind::SiO2Na2O => "활성화제 모듈러스 - 겔 형성",
            RatioKind::H2ONa2O => "활성화제 희석도 - 백화 위험",
            RatioKind::H2OSiO2 => "작업성 - 가압 성형성",
            RatioKind::CaSi => "C-A-S-H/C-S-H 겔 - 초기/장기 강도",
            RatioKind::CaNaAl => "전체 활성화 용량 - 구조 형성",
        }
    }

    /// Si 총량이 분자나 분모에 들어가는 몰비인지 여부.
    pub fn depends_on_silicon(self) -> bool {
        matches!(
            self,
            RatioKind::SiAl | RatioKind::SiO2Na2O | RatioKind::H2OSiO2 | RatioKind::CaSi
        )
    }

    fn index(self) -> usize {
        self as usize
    }

    /// 몰 합계로부터 몰비를 계산한다. 분모가 0이면 `None`(정의되지 않음).
    pub fn evaluate(self, t: &MoleTotals) -> Option<f64> {
        let (num, den) = match self {
            RatioKind::SiAl => (t.si, t.al),
            RatioKind::NaAl => (2.0 * t.na2o, t.al),
            RatioKind::SiO2Na2O => (t.si, t.na2o),
            RatioKind::H2ONa2O => (t.h2o, t.na2o),
            RatioKind::H2OSiO2 => (t.h2o, t.si),
            RatioKind::CaSi => (t.ca, t.si),
            RatioKind::CaNaAl => (t.ca + 2.0 * t.na2o, t.al),
        };
        (den != 0.0).then(|| num / den)
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 몰비 7종의 계산 결과. 값이 `None`이면 분모가 0이라 정의되지 않은 것이며,
/// 실제로 0인 몰비(`Some(0.0)`)와 구분된다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSet {
    values: [Option<f64>; RatioKind::COUNT],
}

impl RatioSet {
    pub fn get(&self, kind: RatioKind) -> Option<f64> {
        self.values[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatioKind, Option<f64>)> + '_ {
        RatioKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

/// 몰 합계로부터 전체 몰비 집합을 만든다.
pub fn ratios_from_totals(totals: &MoleTotals) -> RatioSet {
    let mut values = [None; RatioKind::COUNT];
    for kind in RatioKind::ALL {
        values[kind.index()] = kind.evaluate(totals);
    }
    RatioSet { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, k) in RatioKind::ALL.into_iter().enumerate() {
            assert_eq!(k.index(), i);
            assert_eq!(RatioKind::from_label(k.label()), Some(k));
        }
    }

    #[test]
    fn zero_numerator_is_defined_zero() {
        let t = MoleTotals {
            si: 2.0,
            al: 1.0,
            ..MoleTotals::default()
        };
        let r = ratios_from_totals(&t);
        assert_eq!(r.get(RatioKind::CaSi), Some(0.0));
        assert_eq!(r.get(RatioKind::SiO2Na2O), None);
    }
}
