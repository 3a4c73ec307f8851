//! 단위 정의 및 변환.

pub mod mass;

pub use mass::{convert_mass, MassUnit};
