use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::chemistry::{
    aggregate, moles_from_material, Material, MaterialError, MaterialRole, MixError, MixInput,
    MoleTotals,
};

use super::ratios::{ratios_from_totals, RatioKind, RatioSet};
use super::risk::{classify_risk, RiskAssessment, TierStrategy};
use super::targets::TargetProfile;

/// 이 값보다 작은 음수 질량은 부동소수 오차로 보고 경고 없이 0으로 둔다.
const NEGATIVE_MASS_TOLERANCE_G: f64 = 1e-9;
const DEGENERATE: f64 = 1e-12;

/// 목표 몰비를 어떤 순서로 따라가며 총량을 정할지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveChain {
    /// 고로슬래그 고정: Ca → Si(Ca/Si) → Al(Si/Al), 보조 전구체가 Al 부족분을 채운다.
    #[default]
    CalciumLed,
    /// 메타카올린 고정: Al → Si(Si/Al) → Ca(Ca/Si, 보조 전구체가 있을 때).
    AluminiumLed,
}

/// Na2O 총량을 유도하는 기준 몰비.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SodiumBasis {
    /// Na2O = Na/Al × Al / 2
    #[default]
    SodiumToAluminium,
    /// Na2O = ((Ca+Na)/Al × Al - Ca) / 2
    CationsToAluminium,
    /// Na2O = Si / (SiO2/Na2O)
    SilicaToSodium,
}

impl SodiumBasis {
    pub fn ratio(self) -> RatioKind {
        match self {
            SodiumBasis::SodiumToAluminium => RatioKind::NaAl,
            SodiumBasis::CationsToAluminium => RatioKind::CaNaAl,
            SodiumBasis::SilicaToSodium => RatioKind::SiO2Na2O,
        }
    }
}

/// NaOH 용액과 규산염 용액 사이의 Na2O 배분 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// 규산염이 부족한 Si를 정확히 채우고, 나머지 Na2O는 NaOH가 채운다.
    #[default]
    SilicaShortfall,
    /// 부족한 Na2O를 NaOH와 규산염이 50:50으로 나눈다.
    EvenSplit,
}

/// 역계산 전략 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverOptions {
    #[serde(default)]
    pub chain: SolveChain,
    #[serde(default)]
    pub sodium_basis: SodiumBasis,
    #[serde(default)]
    pub split: SplitStrategy,
    #[serde(default)]
    pub tier: TierStrategy,
}

/// 역계산 입력. 고정 재료(anchor) 질량과 목표 몰비로 나머지 재료 질량을 구한다.
#[derive(Debug, Clone)]
pub struct InverseRequest {
    pub anchor: Material,
    pub anchor_mass_g: f64,
    /// 부족한 Al(또는 Ca)을 채우는 두 번째 고체 전구체
    pub complement: Option<Material>,
    pub alkaline: Material,
    pub silicate: Material,
    pub water: Material,
    pub targets: TargetProfile,
    pub options: SolverOptions,
}

/// 역계산 실패.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// 유도 사슬이 0 분모나 누락된 목표값에 막힘
    Precondition {
        ratio: RatioKind,
        reason: &'static str,
    },
    /// 재료가 요구되는 역할과 다름
    RoleMismatch {
        name: String,
        expected: MaterialRole,
        found: MaterialRole,
    },
    /// Ca 기준 사슬에 Al 공급원이 없음
    MissingComplement,
    /// 재료 정의 오류
    Material(MaterialError),
    /// 배합 구성 오류
    Mix(MixError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Precondition { ratio, reason } => {
                write!(f, "역계산 전제조건 불충족 ({ratio}): {reason}")
            }
            SolveError::RoleMismatch {
                name,
                expected,
                found,
            } => write!(f, "{name}: {expected} 자리에 {found} 재료가 지정되었습니다."),
            SolveError::MissingComplement => {
                write!(f, "Ca 기준 역계산에는 Al 공급용 보조 전구체가 필요합니다.")
            }
            SolveError::Material(e) => write!(f, "재료 오류: {e}"),
            SolveError::Mix(e) => write!(f, "배합 오류: {e}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<MixError> for SolveError {
    fn from(value: MixError) -> Self {
        SolveError::Mix(value)
    }
}

impl From<MaterialError> for SolveError {
    fn from(value: MaterialError) -> Self {
        SolveError::Material(value)
    }
}

/// 역계산 중 보정이 일어난 경우의 경고.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverWarning {
    /// 음수 질량이 필요해 0으로 보정함. 고정 재료만으로 이미 목표를 넘어선 경우다.
    Unreachable { material: String, raw_mass_g: f64 },
    /// 기준 몰비로 유도한 Na2O 총량이 음수라 0으로 보정함. 고체의 Ca가 이미 목표를 넘어선 경우다.
    SodiumSurplus { ratio: RatioKind, raw_na2o_mol: f64 },
}

impl fmt::Display for SolverWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverWarning::Unreachable {
                material,
                raw_mass_g,
            } => write!(
                f,
                "목표 도달 불가: {material} 계산 질량 {raw_mass_g:.1} g → 0 g (추가 재료 불필요)"
            ),
            SolverWarning::SodiumSurplus {
                ratio,
                raw_na2o_mol,
            } => write!(
                f,
                "목표 도달 불가: {ratio} 기준 Na2O {raw_na2o_mol:.3} mol → 0 mol (Ca가 이미 목표 초과)"
            ),
        }
    }
}

/// 역계산 결과.
#[derive(Debug, Clone)]
pub struct InverseResult {
    /// 계산된 배합. 그대로 정방향 계산에 넣을 수 있다.
    pub mix: MixInput,
    /// 목표 몰비 사슬에서 유도한 총량
    pub target_totals: MoleTotals,
    /// `mix`의 정방향 몰비
    pub ratios: RatioSet,
    /// 보정이 없을 때 정확히 재현되는 목표 몰비
    pub honored: Vec<RatioKind>,
    pub warnings: Vec<SolverWarning>,
    pub risk: RiskAssessment,
}

impl InverseResult {
    pub fn is_clamped(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn precondition(ratio: RatioKind, reason: &'static str) -> SolveError {
    SolveError::Precondition { ratio, reason }
}

fn require(targets: &TargetProfile, ratio: RatioKind) -> Result<f64, SolveError> {
    targets
        .get(ratio)
        .ok_or_else(|| precondition(ratio, "목표값이 지정되지 않았습니다."))
}

fn require_divisor(targets: &TargetProfile, ratio: RatioKind) -> Result<f64, SolveError> {
    let value = require(targets, ratio)?;
    if value <= 0.0 {
        return Err(precondition(ratio, "목표값이 0이라 나눌 수 없습니다."));
    }
    Ok(value)
}

fn expect_role(material: &Material, expected: MaterialRole) -> Result<(), SolveError> {
    material.validate()?;
    let found = material.role();
    if found != expected {
        return Err(SolveError::RoleMismatch {
            name: material.name.clone(),
            expected,
            found,
        });
    }
    Ok(())
}

fn clamp_mass(material: &Material, raw_mass_g: f64, warnings: &mut Vec<SolverWarning>) -> f64 {
    if raw_mass_g < -NEGATIVE_MASS_TOLERANCE_G {
        warn!(material = %material.name, raw_mass_g, "음수 질량을 0으로 보정");
        warnings.push(SolverWarning::Unreachable {
            material: material.name.clone(),
            raw_mass_g,
        });
        0.0
    } else {
        raw_mass_g.max(0.0)
    }
}

/// Ca = k·Al (k = Ca/Si × Si/Al)을 만족하는 보조 전구체 질량.
fn complement_mass(
    anchor: &MoleTotals,
    unit: &MoleTotals,
    k: f64,
    blocking: RatioKind,
) -> Result<f64, SolveError> {
    let denom = k * unit.al - unit.ca;
    if denom.abs() < DEGENERATE {
        return Err(precondition(
            blocking,
            "보조 전구체로 Ca/Al 균형을 맞출 수 없습니다.",
        ));
    }
    Ok((anchor.ca - k * anchor.al) / denom)
}

/// 고정 재료 질량과 목표 몰비로부터 나머지 재료 질량을 역산한다.
pub fn compute_inverse(request: &InverseRequest) -> Result<InverseResult, SolveError> {
    let InverseRequest {
        anchor,
        anchor_mass_g,
        complement,
        alkaline,
        silicate,
        water,
        targets,
        options,
    } = request;

    expect_role(anchor, MaterialRole::SolidPrecursor)?;
    if let Some(c) = complement {
        expect_role(c, MaterialRole::SolidPrecursor)?;
    }
    expect_role(alkaline, MaterialRole::AlkalineSolution)?;
    expect_role(silicate, MaterialRole::SilicateSolution)?;
    expect_role(water, MaterialRole::FreeWater)?;

    let anchor_moles = moles_from_material(anchor, *anchor_mass_g)?;
    let complement_unit = match complement {
        Some(c) => moles_from_material(c, 1.0)?,
        None => MoleTotals::default(),
    };

    let mut warnings = Vec::new();
    let mut used = Vec::new();

    let (complement_mass_g, si_total, al_total, ca_total) = match options.chain {
        SolveChain::CalciumLed => {
            let ca_si = require_divisor(targets, RatioKind::CaSi)?;
            let si_al = require_divisor(targets, RatioKind::SiAl)?;
            let complement = complement.as_ref().ok_or(SolveError::MissingComplement)?;
            let raw = complement_mass(
                &anchor_moles,
                &complement_unit,
                ca_si * si_al,
                RatioKind::SiAl,
            )?;
            let x = clamp_mass(complement, raw, &mut warnings);
            let ca_total = anchor_moles.ca + x * complement_unit.ca;
            if ca_total <= 0.0 {
                return Err(precondition(
                    RatioKind::CaSi,
                    "Ca 총량이 0이라 Si 총량을 유도할 수 없습니다.",
                ));
            }
            let si_total = ca_total / ca_si;
            let al_total = si_total / si_al;
            used.extend([RatioKind::CaSi, RatioKind::SiAl]);
            (x, si_total, al_total, ca_total)
        }
        SolveChain::AluminiumLed => {
            let si_al = require(targets, RatioKind::SiAl)?;
            let x = match (complement, targets.get(RatioKind::CaSi)) {
                (Some(c), Some(ca_si)) => {
                    let raw = complement_mass(
                        &anchor_moles,
                        &complement_unit,
                        ca_si * si_al,
                        RatioKind::CaSi,
                    )?;
                    used.push(RatioKind::CaSi);
                    clamp_mass(c, raw, &mut warnings)
                }
                _ => 0.0,
            };
            let al_total = anchor_moles.al + x * complement_unit.al;
            if al_total <= 0.0 {
                return Err(precondition(
                    RatioKind::SiAl,
                    "Al 총량이 0이라 Si/Al이 의미가 없습니다.",
                ));
            }
            let si_total = al_total * si_al;
            let ca_total = anchor_moles.ca + x * complement_unit.ca;
            used.push(RatioKind::SiAl);
            (x, si_total, al_total, ca_total)
        }
    };

    let basis_ratio = options.sodium_basis.ratio();
    let raw_na2o = match options.sodium_basis {
        SodiumBasis::SodiumToAluminium => require(targets, basis_ratio)? * al_total / 2.0,
        SodiumBasis::CationsToAluminium => {
            (require(targets, basis_ratio)? * al_total - ca_total) / 2.0
        }
        SodiumBasis::SilicaToSodium => si_total / require_divisor(targets, basis_ratio)?,
    };
    let h2o_na2o = require(targets, RatioKind::H2ONa2O)?;
    let na2o_total = if raw_na2o > 0.0 {
        used.extend([basis_ratio, RatioKind::H2ONa2O]);
        raw_na2o
    } else {
        // Ca만으로 양이온 목표를 넘어선 경우. Na2O와 H2O 목표는 0이 되고 나머지 재료가 보정된다.
        if raw_na2o < 0.0 {
            warn!(ratio = %basis_ratio, raw_na2o_mol = raw_na2o, "Na2O 요구량 음수, 0으로 보정");
            warnings.push(SolverWarning::SodiumSurplus {
                ratio: basis_ratio,
                raw_na2o_mol: raw_na2o,
            });
        }
        0.0
    };
    let h2o_total = na2o_total * h2o_na2o;

    let target_totals = MoleTotals {
        si: si_total,
        al: al_total,
        na2o: na2o_total,
        ca: ca_total,
        h2o: h2o_total,
    };
    debug!(chain = ?options.chain, ?target_totals, complement_mass_g, "목표 총량 유도");

    // 고체 전구체가 이미 공급한 몰량을 뺀 나머지를 활성화제와 추가수로 채운다.
    let base = anchor_moles + complement_unit.scaled(complement_mass_g);
    let silicate_unit = moles_from_material(silicate, 1.0)?;
    let alkaline_unit = moles_from_material(alkaline, 1.0)?;
    let water_unit = moles_from_material(water, 1.0)?;

    let na2o_short = na2o_total - base.na2o;
    let (silicate_mass_g, alkaline_mass_g) = match options.split {
        SplitStrategy::SilicaShortfall => {
            let si_short = si_total - base.si;
            let m_sil = clamp_mass(silicate, si_short / silicate_unit.si, &mut warnings);
            let na2o_alk = na2o_short - m_sil * silicate_unit.na2o;
            let m_alk = clamp_mass(alkaline, na2o_alk / alkaline_unit.na2o, &mut warnings);
            (m_sil, m_alk)
        }
        SplitStrategy::EvenSplit => {
            let half = na2o_short / 2.0;
            let m_sil = clamp_mass(silicate, half / silicate_unit.na2o, &mut warnings);
            let m_alk = clamp_mass(alkaline, half / alkaline_unit.na2o, &mut warnings);
            (m_sil, m_alk)
        }
    };

    let h2o_short = h2o_total
        - base.h2o
        - silicate_mass_g * silicate_unit.h2o
        - alkaline_mass_g * alkaline_unit.h2o;
    let water_mass_g = clamp_mass(water, h2o_short / water_unit.h2o, &mut warnings);

    let mut mix = MixInput::new().with(anchor.clone(), *anchor_mass_g)?;
    if let Some(c) = complement {
        mix = mix.with(c.clone(), complement_mass_g)?;
    }
    let mix = mix
        .with(alkaline.clone(), alkaline_mass_g)?
        .with(silicate.clone(), silicate_mass_g)?
        .with(water.clone(), water_mass_g)?;

    let ratios = ratios_from_totals(&aggregate(&mix));
    let risk = classify_risk(&ratios, options.tier, targets);

    let honored = used
        .into_iter()
        .filter(|r| options.split != SplitStrategy::EvenSplit || !r.depends_on_silicon())
        .collect();

    info!(
        anchor = %anchor.name,
        total_mass_g = mix.total_mass_g(),
        warnings = warnings.len(),
        "역계산 완료"
    );

    Ok(InverseResult {
        mix,
        target_totals,
        ratios,
        honored,
        warnings,
        risk,
    })
}
