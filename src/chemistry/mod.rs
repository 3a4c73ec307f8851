//! 산화물 성분표, 재료 정의, 몰 환산 모듈 모음.

pub mod material;
pub mod moles;
pub mod oxide;

pub use material::{presets, Material, MaterialError, MaterialKind, MaterialRole};
pub use moles::{aggregate, moles_from_material, MixEntry, MixError, MixInput, MoleTotals};
pub use oxide::{molar_mass, Oxide, OxideError, OxideFractions};
