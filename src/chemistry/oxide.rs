use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 몰질량 상수 [g/mol]. 계산 전체에서 공유하는 읽기 전용 테이블이다.
pub mod molar_mass {
    pub const SIO2: f64 = 60.08;
    pub const AL2O3: f64 = 101.96;
    pub const NA2O: f64 = 61.98;
    pub const NAOH: f64 = 40.00;
    pub const H2O: f64 = 18.015;
    pub const CAO: f64 = 56.08;
}

/// 재료 성분표에서 추적하는 산화물.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Oxide {
    SiO2,
    Al2O3,
    Na2O,
    CaO,
    /// 고체 내 수분(LOI 등)
    H2O,
}

impl Oxide {
    pub const ALL: [Oxide; 5] = [Oxide::SiO2, Oxide::Al2O3, Oxide::Na2O, Oxide::CaO, Oxide::H2O];

    pub fn symbol(self) -> &'static str {
        match self {
            Oxide::SiO2 => "SiO2",
            Oxide::Al2O3 => "Al2O3",
            Oxide::Na2O => "Na2O",
            Oxide::CaO => "CaO",
            Oxide::H2O => "H2O",
        }
    }

    /// 화학식 문자열을 enum으로 변환한다. 대소문자까지 정확히 일치해야 한다.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.symbol() == symbol)
    }

    pub fn molar_mass(self) -> f64 {
        match self {
            Oxide::SiO2 => molar_mass::SIO2,
            Oxide::Al2O3 => molar_mass::AL2O3,
            Oxide::Na2O => molar_mass::NA2O,
            Oxide::CaO => molar_mass::CAO,
            Oxide::H2O => molar_mass::H2O,
        }
    }
}

impl fmt::Display for Oxide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 산화물 성분표 검증 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum OxideError {
    /// 알 수 없거나 오타가 있는 산화물 키
    UnknownOxide(String),
    /// 0~1 범위를 벗어난 분율
    FractionOutOfRange { oxide: Oxide, value: f64 },
    /// 분율 합계가 1을 초과
    SumExceedsOne(f64),
}

impl fmt::Display for OxideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OxideError::UnknownOxide(key) => write!(f, "알 수 없는 산화물 키: {key}"),
            OxideError::FractionOutOfRange { oxide, value } => {
                write!(f, "{oxide} 분율 {value}은(는) 0~1 범위여야 합니다.")
            }
            OxideError::SumExceedsOne(sum) => write!(f, "산화물 분율 합계 {sum:.4}가 1을 초과합니다."),
        }
    }
}

impl std::error::Error for OxideError {}

/// 재료 질량 대비 산화물 질량 분율.
///
/// 미추적 잔류분이 있으므로 합계가 1이 아니어도 된다. 키는 [`Oxide`]로 엄격히 제한되며,
/// 직렬화 시에는 화학식 문자열 키의 테이블로 표현된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct OxideFractions {
    fractions: BTreeMap<Oxide, f64>,
}

impl OxideFractions {
    /// (산화물, 분율) 목록으로부터 검증된 성분표를 만든다.
    pub fn new<I>(pairs: I) -> Result<Self, OxideError>
    where
        I: IntoIterator<Item = (Oxide, f64)>,
    {
        let mut fractions = BTreeMap::new();
        for (oxide, value) in pairs {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(OxideError::FractionOutOfRange { oxide, value });
            }
            fractions.insert(oxide, value);
        }
        let sum: f64 = fractions.values().sum();
        if sum > 1.0 + 1e-9 {
            return Err(OxideError::SumExceedsOne(sum));
        }
        Ok(Self { fractions })
    }

    /// 검증 없이 상수 표로부터 만든다. 프리셋 전용이며 [`Material::validate`]가 다시 검사한다.
    ///
    /// [`Material::validate`]: crate::chemistry::Material::validate
    pub(crate) fn from_table(pairs: &[(Oxide, f64)]) -> Self {
        Self {
            fractions: pairs.iter().copied().collect(),
        }
    }

    /// 해당 산화물 분율. 성분표에 없으면 0이다.
    pub fn get(&self, oxide: Oxide) -> f64 {
        self.fractions.get(&oxide).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Oxide, f64)> + '_ {
        self.fractions.iter().map(|(o, v)| (*o, *v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for OxideFractions {
    type Error = OxideError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut pairs = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let oxide = Oxide::from_symbol(&key).ok_or(OxideError::UnknownOxide(key))?;
            pairs.push((oxide, value));
        }
        Self::new(pairs)
    }
}

impl From<OxideFractions> for BTreeMap<String, f64> {
    fn from(value: OxideFractions) -> Self {
        value
            .fractions
            .into_iter()
            .map(|(o, v)| (o.symbol().to_string(), v))
            .collect()
    }
}
