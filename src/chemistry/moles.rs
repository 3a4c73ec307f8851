use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::material::{Material, MaterialKind};
use super::oxide::{molar_mass, Oxide};

/// 배합 입력 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum MixError {
    /// 음수 질량
    NegativeMass { name: String, mass_g: f64 },
    /// NaN/무한대 질량
    NonFiniteMass { name: String },
    /// 같은 이름의 재료가 두 번 들어옴
    DuplicateMaterial(String),
}

impl fmt::Display for MixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixError::NegativeMass { name, mass_g } => {
                write!(f, "{name}: 질량 {mass_g} g은(는) 음수일 수 없습니다.")
            }
            MixError::NonFiniteMass { name } => write!(f, "{name}: 질량이 유효한 숫자가 아닙니다."),
            MixError::DuplicateMaterial(name) => write!(f, "재료 {name}이(가) 중복되었습니다."),
        }
    }
}

impl std::error::Error for MixError {}

fn check_mass(name: &str, mass_g: f64) -> Result<(), MixError> {
    if !mass_g.is_finite() {
        return Err(MixError::NonFiniteMass {
            name: name.to_string(),
        });
    }
    if mass_g < 0.0 {
        return Err(MixError::NegativeMass {
            name: name.to_string(),
            mass_g,
        });
    }
    Ok(())
}

/// 원소 기준 몰량. 재료 하나의 기여분이나 배합 전체 합계 모두 이 형태로 다룬다.
///
/// `al`은 단량체 기준(Al2O3 몰 × 2)이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MoleTotals {
    pub si: f64,
    pub al: f64,
    pub na2o: f64,
    pub ca: f64,
    pub h2o: f64,
}

impl MoleTotals {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            si: self.si * factor,
            al: self.al * factor,
            na2o: self.na2o * factor,
            ca: self.ca * factor,
            h2o: self.h2o * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.si == 0.0 && self.al == 0.0 && self.na2o == 0.0 && self.ca == 0.0 && self.h2o == 0.0
    }
}

impl Add for MoleTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            si: self.si + rhs.si,
            al: self.al + rhs.al,
            na2o: self.na2o + rhs.na2o,
            ca: self.ca + rhs.ca,
            h2o: self.h2o + rhs.h2o,
        }
    }
}

impl AddAssign for MoleTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MoleTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// 재료 질량을 원소 몰 기여분으로 환산한다.
///
/// - 고체: 산화물별 `질량 × 분율 / 몰질량`, Al은 Al2O3 몰의 2배
/// - NaOH 용액: 2 NaOH → Na2O + H2O 이므로 Na2O = NaOH/2, 나머지 질량은 물
/// - 규산염 용액: Na2O = 고형분 / (M_SiO2·R + M_Na2O), Si = R·Na2O
/// - 추가수: H2O만 기여
pub fn moles_from_material(material: &Material, mass_g: f64) -> Result<MoleTotals, MixError> {
    check_mass(&material.name, mass_g)?;
    if mass_g == 0.0 {
        return Ok(MoleTotals::default());
    }
    let moles = match &material.kind {
        MaterialKind::SolidPrecursor { oxides } => MoleTotals {
            si: mass_g * oxides.get(Oxide::SiO2) / molar_mass::SIO2,
            al: 2.0 * mass_g * oxides.get(Oxide::Al2O3) / molar_mass::AL2O3,
            na2o: mass_g * oxides.get(Oxide::Na2O) / molar_mass::NA2O,
            ca: mass_g * oxides.get(Oxide::CaO) / molar_mass::CAO,
            h2o: mass_g * oxides.get(Oxide::H2O) / molar_mass::H2O,
        },
        MaterialKind::AlkalineSolution { solids_fraction } => {
            let mol_naoh = mass_g * solids_fraction / molar_mass::NAOH;
            MoleTotals {
                na2o: mol_naoh / 2.0,
                h2o: mass_g * (1.0 - solids_fraction) / molar_mass::H2O,
                ..MoleTotals::default()
            }
        }
        MaterialKind::SilicateSolution {
            solids_fraction,
            modulus,
        } => {
            let mol_na2o =
                mass_g * solids_fraction / (molar_mass::SIO2 * modulus + molar_mass::NA2O);
            MoleTotals {
                si: modulus * mol_na2o,
                na2o: mol_na2o,
                h2o: mass_g * (1.0 - solids_fraction) / molar_mass::H2O,
                ..MoleTotals::default()
            }
        }
        MaterialKind::FreeWater => MoleTotals {
            h2o: mass_g / molar_mass::H2O,
            ..MoleTotals::default()
        },
        MaterialKind::Additive => MoleTotals::default(),
    };
    Ok(moles)
}

/// 재료가 배합에 들여오는 물의 질량 [g].
pub fn water_mass_g(material: &Material, mass_g: f64) -> f64 {
    match &material.kind {
        MaterialKind::SolidPrecursor { oxides } => mass_g * oxides.get(Oxide::H2O),
        MaterialKind::AlkalineSolution { solids_fraction }
        | MaterialKind::SilicateSolution {
            solids_fraction, ..
        } => mass_g * (1.0 - solids_fraction),
        MaterialKind::FreeWater => mass_g,
        MaterialKind::Additive => 0.0,
    }
}

/// 배합의 한 줄: 재료와 질량[g].
#[derive(Debug, Clone, PartialEq)]
pub struct MixEntry {
    pub material: Material,
    pub mass_g: f64,
}

/// 재료별 질량 입력 스냅샷. 생성 시점에 질량(≥0)과 이름 중복을 검증하며 이후 변경하지 않는다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixInput {
    entries: Vec<MixEntry>,
}

impl MixInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// 재료 한 줄을 추가한 새 스냅샷을 반환한다.
    pub fn with(mut self, material: Material, mass_g: f64) -> Result<Self, MixError> {
        check_mass(&material.name, mass_g)?;
        if self.entries.iter().any(|e| e.material.name == material.name) {
            return Err(MixError::DuplicateMaterial(material.name));
        }
        self.entries.push(MixEntry { material, mass_g });
        Ok(self)
    }

    pub fn entries(&self) -> &[MixEntry] {
        &self.entries
    }

    pub fn mass_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.material.name == name)
            .map(|e| e.mass_g)
    }

    pub fn total_mass_g(&self) -> f64 {
        self.entries.iter().map(|e| e.mass_g).sum()
    }

    /// 전체 물 질량 / 전체 고형분 질량. 고형분이 없으면 `None`.
    pub fn water_binder_ratio(&self) -> Option<f64> {
        let water: f64 = self
            .entries
            .iter()
            .map(|e| water_mass_g(&e.material, e.mass_g))
            .sum();
        let solids = self.total_mass_g() - water;
        (solids > 0.0).then(|| water / solids)
    }
}

/// 질량이 0보다 큰 모든 재료의 몰 기여분을 합산한다.
pub fn aggregate(mix: &MixInput) -> MoleTotals {
    mix.entries
        .iter()
        .filter(|e| e.mass_g > 0.0)
        // MixInput 생성 시 질량을 검증했으므로 실패하지 않는다.
        .filter_map(|e| moles_from_material(&e.material, e.mass_g).ok())
        .sum()
}
