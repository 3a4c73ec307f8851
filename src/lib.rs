//! 지오폴리머 결합재 배합 계산 라이브러리.
//! 산화물 화학량론으로 몰 합계와 몰비를 구하고, 목표 몰비로부터 재료 질량을 역산한다.

pub mod app;
pub mod chemistry;
pub mod config;
pub mod design;
pub mod ui_cli;
pub mod units;
