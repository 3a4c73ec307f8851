use serde::{Deserialize, Serialize};

/// 질량 단위. 배합 계산의 내부 기준은 g이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    #[default]
    Gram,
    Kilogram,
    Pound,
}

impl MassUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Pound => "lb",
        }
    }
}

fn to_g(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Gram => value,
        MassUnit::Kilogram => value * 1000.0,
        MassUnit::Pound => value * 453.592,
    }
}

fn from_g(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Gram => value,
        MassUnit::Kilogram => value / 1000.0,
        MassUnit::Pound => value / 453.592,
    }
}

/// 질량을 변환한다.
pub fn convert_mass(value: f64, from: MassUnit, to: MassUnit) -> f64 {
    from_g(to_g(value, from), to)
}
