use clap::Subcommand;

use crate::app::AppError;
use crate::chemistry::{MixInput, MoleTotals};
use crate::config::Config;
use crate::design::{
    self, DeviationTable, DisplayPrecision, RatioKind, RatioSet, RiskAssessment, TargetProfile,
};
use crate::design::risk::moisture_class;
use crate::units::{convert_mass, MassUnit};

/// CLI 하위 명령.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 설정의 배합 질량으로 몰비와 위험도를 계산
    Forward,
    /// 고정 재료 질량과 목표 몰비로 나머지 재료 질량을 역산
    Inverse {
        /// 고정 재료 질량 (설정 단위 기준, 생략 시 설정값)
        #[arg(long)]
        anchor_mass: Option<f64>,
    },
    /// 설정 배합(현장)을 역산 배합(실험실)과 비교
    Compare,
    /// 기본 설정을 TOML로 출력
    Defaults,
}

/// 정방향 계산 결과를 출력한다.
pub fn handle_forward(cfg: &Config) -> Result<(), AppError> {
    let mix = cfg.mix_input()?;
    let result = design::compute_forward(&mix);
    println!("\n=== 정방향 계산 ===");
    print_mix(&mix, cfg.mass_unit);
    print_totals(&result.totals);
    let table = design::compute_deviation(&result.ratios, &cfg.targets, cfg.deviation_precision);
    print_ratio_table(&result.ratios, &table);
    let risk = design::classify_risk(&result.ratios, cfg.solver.tier, &cfg.targets);
    print_risk(&risk);
    match mix.water_binder_ratio() {
        Some(wb) => println!("물/결합재 질량비: {wb:.3} ({})", moisture_class(wb)),
        None => println!("물/결합재 질량비: 평가 불가 (고형분 없음)"),
    }
    Ok(())
}

/// 역계산 결과를 출력한다.
pub fn handle_inverse(cfg: &Config, anchor_mass: Option<f64>) -> Result<(), AppError> {
    let request = cfg.inverse_request(anchor_mass)?;
    let result = design::compute_inverse(&request)?;
    println!("\n=== 역계산 ({} 고정) ===", request.anchor.name);
    print_mix(&result.mix, cfg.mass_unit);
    println!("\n목표 몰 총량:");
    print_totals(&result.target_totals);
    let table = design::compute_deviation(&result.ratios, &cfg.targets, cfg.deviation_precision);
    print_ratio_table(&result.ratios, &table);
    let honored: Vec<&str> = result.honored.iter().map(|r| r.label()).collect();
    println!("정확히 맞춘 목표: {}", honored.join(", "));
    for w in &result.warnings {
        println!("경고: {w}");
    }
    print_risk(&result.risk);
    Ok(())
}

/// 현장 배합의 몰비를 실험실 역산 배합 몰비와 비교한다.
pub fn handle_compare(cfg: &Config) -> Result<(), AppError> {
    let lab = design::compute_inverse(&cfg.inverse_request(None)?)?;
    let factory = design::compute_forward(&cfg.mix_input()?);
    let reference = TargetProfile::from_ratios(&lab.ratios);
    let table = design::compute_deviation(&factory.ratios, &reference, DisplayPrecision::OneDecimal);
    println!("\n=== 실험실 대비 현장 배합 편차 ===");
    println!("{:<12}{:>10}{:>10}{:>12}", "몰비", "실험실", "현장", "편차(%)");
    for row in &table.rows {
        println!(
            "{:<12}{:>10.3}{:>10}{:>12}",
            row.ratio.label(),
            row.target,
            fmt_opt(row.value, 3),
            fmt_opt(row.percent, 1)
        );
    }
    Ok(())
}

pub fn handle_defaults() -> Result<(), AppError> {
    println!("{}", Config::default().to_toml()?);
    Ok(())
}

fn fmt_opt(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format!("{v:.digits$}"),
        None => "-".to_string(),
    }
}

fn print_mix(mix: &MixInput, unit: MassUnit) {
    println!("{:<20}{:>12}", "재료", format!("질량({})", unit.symbol()));
    for entry in mix.entries() {
        let mass = convert_mass(entry.mass_g, MassUnit::Gram, unit);
        println!("{:<20}{:>12.1}", entry.material.name, mass);
    }
}

fn print_totals(t: &MoleTotals) {
    println!(
        "mol Si {:.3}, mol Al {:.3}, mol Na2O {:.3}, mol Ca {:.3}, mol H2O {:.3}",
        t.si, t.al, t.na2o, t.ca, t.h2o
    );
}

fn print_ratio_table(ratios: &RatioSet, table: &DeviationTable) {
    println!(
        "{:<12}{:>10}{:>10}{:>10}  설명",
        "몰비", "값", "목표", "편차(%)"
    );
    for kind in RatioKind::ALL {
        let row = table.get(kind);
        println!(
            "{:<12}{:>10}{:>10}{:>10}  {}",
            kind.label(),
            fmt_opt(ratios.get(kind), 3),
            fmt_opt(row.map(|r| r.target), 3),
            fmt_opt(row.and_then(|r| r.percent), 1),
            kind.description()
        );
    }
}

fn print_risk(risk: &RiskAssessment) {
    match risk.efflorescence {
        Some(r) => println!("백화 위험: {r}"),
        None => println!("백화 위험: 평가 불가"),
    }
    match risk.pressability {
        Some(p) => println!("가압 성형성: {p}"),
        None => println!("가압 성형성: 평가 불가"),
    }
}
