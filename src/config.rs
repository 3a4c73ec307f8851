use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::chemistry::{presets, Material, MaterialError, MixError, MixInput};
use crate::design::{DisplayPrecision, InverseRequest, SolverOptions, TargetProfile};
use crate::units::{convert_mass, MassUnit};

/// 설정 파일 기본 경로.
pub const DEFAULT_CONFIG_PATH: &str = "geopolymer.toml";

/// 정방향 계산용 배합 한 줄. `mass`는 [`Config::mass_unit`] 기준이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixLine {
    pub material: String,
    pub mass: f64,
}

/// 역계산에 쓸 재료 지정. 이름은 `materials` 목록에서 찾는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverseSetup {
    pub anchor: String,
    pub anchor_mass: f64,
    #[serde(default)]
    pub complement: Option<String>,
    pub alkaline: String,
    pub silicate: String,
    pub water: String,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub mass_unit: MassUnit,
    #[serde(default)]
    pub deviation_precision: DisplayPrecision,
    #[serde(default)]
    pub targets: TargetProfile,
    #[serde(default)]
    pub solver: SolverOptions,
    pub materials: Vec<Material>,
    #[serde(default)]
    pub mix: Vec<MixLine>,
    pub inverse: InverseSetup,
}

impl Default for Config {
    fn default() -> Self {
        let materials = vec![
            presets::metakaolin(),
            presets::ggbfs(),
            presets::naoh_solution(0.5),
            presets::sodium_silicate(0.335, 2.5),
            presets::water(),
        ];
        let line = |material: &str, mass: f64| MixLine {
            material: material.to_string(),
            mass,
        };
        Self {
            mass_unit: MassUnit::Gram,
            deviation_precision: DisplayPrecision::Whole,
            targets: TargetProfile::literature(),
            solver: SolverOptions::default(),
            materials,
            mix: vec![
                line("metakaolin", 300.0),
                line("ggbfs", 200.0),
                line("naoh_solution", 200.0),
                line("sodium_silicate", 300.0),
                line("water", 30.0),
            ],
            inverse: InverseSetup {
                anchor: "ggbfs".to_string(),
                anchor_mass: 200.0,
                complement: Some("metakaolin".to_string()),
                alkaline: "naoh_solution".to_string(),
                silicate: "sodium_silicate".to_string(),
                water: "water".to_string(),
            },
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// 재료 목록에 없는 이름
    UnknownMaterial(String),
    /// 재료 정의 오류
    Material(MaterialError),
    /// 배합 입력 오류
    Mix(MixError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
            ConfigError::UnknownMaterial(name) => write!(f, "재료 목록에 없는 이름: {name}"),
            ConfigError::Material(e) => write!(f, "재료 정의 오류: {e}"),
            ConfigError::Mix(e) => write!(f, "배합 입력 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

impl From<MaterialError> for ConfigError {
    fn from(value: MaterialError) -> Self {
        ConfigError::Material(value)
    }
}

impl From<MixError> for ConfigError {
    fn from(value: MixError) -> Self {
        ConfigError::Mix(value)
    }
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load(path)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}

/// 설정 파일을 읽고 검증한다.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    Config::from_toml(&content)
}

impl Config {
    /// TOML 문자열로부터 설정을 만들고 재료 정의를 검증한다.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for material in &self.materials {
            material.validate()?;
            if !names.insert(material.name.as_str()) {
                return Err(MixError::DuplicateMaterial(material.name.clone()).into());
            }
        }
        Ok(())
    }

    pub fn material(&self, name: &str) -> Result<&Material, ConfigError> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ConfigError::UnknownMaterial(name.to_string()))
    }

    fn grams(&self, mass: f64) -> f64 {
        convert_mass(mass, self.mass_unit, MassUnit::Gram)
    }

    /// `mix` 목록을 g 단위 배합 스냅샷으로 만든다.
    pub fn mix_input(&self) -> Result<MixInput, ConfigError> {
        let mut mix = MixInput::new();
        for line in &self.mix {
            let material = self.material(&line.material)?.clone();
            mix = mix.with(material, self.grams(line.mass))?;
        }
        Ok(mix)
    }

    /// 역계산 요청을 만든다. `anchor_mass`가 주어지면 설정값 대신 사용한다(설정 단위 기준).
    pub fn inverse_request(&self, anchor_mass: Option<f64>) -> Result<InverseRequest, ConfigError> {
        let setup = &self.inverse;
        let complement = match &setup.complement {
            Some(name) => Some(self.material(name)?.clone()),
            None => None,
        };
        Ok(InverseRequest {
            anchor: self.material(&setup.anchor)?.clone(),
            anchor_mass_g: self.grams(anchor_mass.unwrap_or(setup.anchor_mass)),
            complement,
            alkaline: self.material(&setup.alkaline)?.clone(),
            silicate: self.material(&setup.silicate)?.clone(),
            water: self.material(&setup.water)?.clone(),
            targets: self.targets.clone(),
            options: self.solver,
        })
    }
}
