//! 몰비 계산, 목표 대비 편차, 역계산, 위험도 판정 모듈 모음.

pub mod deviation;
pub mod inverse;
pub mod ratios;
pub mod risk;
pub mod targets;

pub use deviation::{compute_deviation, DeviationRow, DeviationTable, DisplayPrecision};
pub use inverse::{
    compute_inverse, InverseRequest, InverseResult, SodiumBasis, SolveChain, SolveError,
    SolverOptions, SolverWarning, SplitStrategy,
};
pub use ratios::{ratios_from_totals, RatioKind, RatioSet};
pub use risk::{
    classify_risk, EfflorescenceRisk, MoistureClass, Pressability, RiskAssessment, TierStrategy,
};
pub use targets::{TargetError, TargetProfile};

use crate::chemistry::{aggregate, MixInput, MoleTotals};

/// 정방향 계산 결과 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardResult {
    pub totals: MoleTotals,
    pub ratios: RatioSet,
}

/// 재료 질량 → 몰 합계 → 몰비를 한 번에 계산한다.
pub fn compute_forward(mix: &MixInput) -> ForwardResult {
    let totals = aggregate(mix);
    ForwardResult {
        ratios: ratios_from_totals(&totals),
        totals,
    }
}
