use crate::config::{Config, ConfigError};
use crate::design::SolveError;
use crate::ui_cli::{self, Command};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 역계산 오류
    Solve(SolveError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Solve(e) => write!(f, "역계산 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<SolveError> for AppError {
    fn from(value: SolveError) -> Self {
        AppError::Solve(value)
    }
}

/// 하위 명령 하나를 실행한다. 매 호출마다 설정 스냅샷에서 처음부터 다시 계산한다.
pub fn run(command: &Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::Forward => ui_cli::handle_forward(config),
        Command::Inverse { anchor_mass } => ui_cli::handle_inverse(config, *anchor_mass),
        Command::Compare => ui_cli::handle_compare(config),
        Command::Defaults => ui_cli::handle_defaults(),
    }
}
