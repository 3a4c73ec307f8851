use serde::{Deserialize, Serialize};
use std::fmt;

use super::oxide::{Oxide, OxideError, OxideFractions};

/// 재료의 역할 구분. 몰 환산 방식이 역할마다 다르다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRole {
    SolidPrecursor,
    AlkalineSolution,
    SilicateSolution,
    FreeWater,
    Additive,
}

impl fmt::Display for MaterialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MaterialRole::SolidPrecursor => "고체 전구체",
            MaterialRole::AlkalineSolution => "알칼리 용액",
            MaterialRole::SilicateSolution => "규산염 용액",
            MaterialRole::FreeWater => "추가수",
            MaterialRole::Additive => "첨가제/충전재",
        };
        f.write_str(label)
    }
}

/// 역할별 재료 특성값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum MaterialKind {
    /// 건조 고체 (메타카올린, 고로슬래그 등)
    SolidPrecursor { oxides: OxideFractions },
    /// NaOH 용액. `solids_fraction`은 순수 NaOH 질량 분율(50% 용액이면 0.5).
    AlkalineSolution { solids_fraction: f64 },
    /// 규산나트륨 용액. `modulus`는 SiO2/Na2O 몰비(MR).
    SilicateSolution { solids_fraction: f64, modulus: f64 },
    FreeWater,
    /// 불활성 충전재·가소제·안정제. 몰 기여는 없고 고형분 질량에만 포함된다.
    Additive,
}

/// 배합 재료 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(flatten)]
    pub kind: MaterialKind,
}

/// 재료 정의 검증 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// 산화물 성분표 오류
    Oxide(OxideError),
    /// 고형분 분율이 (0, 1] 범위를 벗어남
    SolidsFraction { name: String, value: f64 },
    /// 규산염 모듈러스가 0 이하
    Modulus { name: String, value: f64 },
    /// 이름이 비어 있음
    EmptyName,
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::Oxide(e) => write!(f, "성분표 오류: {e}"),
            MaterialError::SolidsFraction { name, value } => {
                write!(f, "{name}: 고형분 분율 {value}은(는) 0 초과 1 이하여야 합니다.")
            }
            MaterialError::Modulus { name, value } => {
                write!(f, "{name}: 모듈러스 {value}은(는) 0보다 커야 합니다.")
            }
            MaterialError::EmptyName => write!(f, "재료 이름이 비어 있습니다."),
        }
    }
}

impl std::error::Error for MaterialError {}

impl From<OxideError> for MaterialError {
    fn from(value: OxideError) -> Self {
        MaterialError::Oxide(value)
    }
}

impl Material {
    /// 검증을 거친 재료를 만든다.
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Result<Self, MaterialError> {
        let material = Self {
            name: name.into(),
            kind,
        };
        material.validate()?;
        Ok(material)
    }

    pub fn solid(
        name: impl Into<String>,
        oxides: impl IntoIterator<Item = (Oxide, f64)>,
    ) -> Result<Self, MaterialError> {
        let oxides = OxideFractions::new(oxides)?;
        Self::new(name, MaterialKind::SolidPrecursor { oxides })
    }

    pub fn alkaline_solution(
        name: impl Into<String>,
        solids_fraction: f64,
    ) -> Result<Self, MaterialError> {
        Self::new(name, MaterialKind::AlkalineSolution { solids_fraction })
    }

    pub fn silicate_solution(
        name: impl Into<String>,
        solids_fraction: f64,
        modulus: f64,
    ) -> Result<Self, MaterialError> {
        Self::new(
            name,
            MaterialKind::SilicateSolution {
                solids_fraction,
                modulus,
            },
        )
    }

    pub fn free_water(name: impl Into<String>) -> Result<Self, MaterialError> {
        Self::new(name, MaterialKind::FreeWater)
    }

    pub fn additive(name: impl Into<String>) -> Result<Self, MaterialError> {
        Self::new(name, MaterialKind::Additive)
    }

    pub fn role(&self) -> MaterialRole {
        match self.kind {
            MaterialKind::SolidPrecursor { .. } => MaterialRole::SolidPrecursor,
            MaterialKind::AlkalineSolution { .. } => MaterialRole::AlkalineSolution,
            MaterialKind::SilicateSolution { .. } => MaterialRole::SilicateSolution,
            MaterialKind::FreeWater => MaterialRole::FreeWater,
            MaterialKind::Additive => MaterialRole::Additive,
        }
    }

    /// 고체 전구체의 산화물 분율. 다른 역할이면 0을 반환한다.
    pub fn oxide_fraction(&self, oxide: Oxide) -> f64 {
        match &self.kind {
            MaterialKind::SolidPrecursor { oxides } => oxides.get(oxide),
            _ => 0.0,
        }
    }

    /// 설정 파일 등 외부에서 들어온 재료 값을 검증한다.
    pub fn validate(&self) -> Result<(), MaterialError> {
        if self.name.trim().is_empty() {
            return Err(MaterialError::EmptyName);
        }
        match &self.kind {
            MaterialKind::SolidPrecursor { oxides } => {
                OxideFractions::new(oxides.iter())?;
                Ok(())
            }
            MaterialKind::AlkalineSolution { solids_fraction } => {
                check_solids(&self.name, *solids_fraction)
            }
            MaterialKind::SilicateSolution {
                solids_fraction,
                modulus,
            } => {
                check_solids(&self.name, *solids_fraction)?;
                if !modulus.is_finite() || *modulus <= 0.0 {
                    return Err(MaterialError::Modulus {
                        name: self.name.clone(),
                        value: *modulus,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn check_solids(name: &str, value: f64) -> Result<(), MaterialError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(MaterialError::SolidsFraction {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

/// 기술자료(TDS) 기준 대표 재료 프리셋.
pub mod presets {
    use super::{Material, MaterialKind};
    use crate::chemistry::oxide::{Oxide, OxideFractions};

    fn solid(name: &str, pairs: &[(Oxide, f64)]) -> Material {
        Material {
            name: name.to_string(),
            kind: MaterialKind::SolidPrecursor {
                oxides: OxideFractions::from_table(pairs),
            },
        }
    }

    /// 메타카올린 (SiO2 57%, Al2O3 26.5%, Na2O 9%)
    pub fn metakaolin() -> Material {
        solid(
            "metakaolin",
            &[(Oxide::SiO2, 0.57), (Oxide::Al2O3, 0.265), (Oxide::Na2O, 0.09)],
        )
    }

    /// 고로슬래그 미분말 (CaO 42.4%)
    pub fn ggbfs() -> Material {
        solid(
            "ggbfs",
            &[
                (Oxide::SiO2, 0.365),
                (Oxide::Al2O3, 0.104),
                (Oxide::Na2O, 0.005),
                (Oxide::CaO, 0.424),
            ],
        )
    }

    pub fn naoh_solution(solids_fraction: f64) -> Material {
        Material {
            name: "naoh_solution".to_string(),
            kind: MaterialKind::AlkalineSolution { solids_fraction },
        }
    }

    pub fn sodium_silicate(solids_fraction: f64, modulus: f64) -> Material {
        Material {
            name: "sodium_silicate".to_string(),
            kind: MaterialKind::SilicateSolution {
                solids_fraction,
                modulus,
            },
        }
    }

    pub fn water() -> Material {
        Material {
            name: "water".to_string(),
            kind: MaterialKind::FreeWater,
        }
    }
}
