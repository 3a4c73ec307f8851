use geopolymer_mix::chemistry::{aggregate, moles_from_material, presets, Material, MixInput};
use geopolymer_mix::design::deviation::percent_deviation;
use geopolymer_mix::design::{
    compute_forward, compute_inverse, InverseRequest, RatioKind, SolverOptions, TargetProfile,
};
use proptest::prelude::*;

fn all_presets() -> Vec<Material> {
    vec![
        presets::metakaolin(),
        presets::ggbfs(),
        presets::naoh_solution(0.5),
        presets::sodium_silicate(0.335, 2.5),
        presets::water(),
    ]
}

fn ggbfs_request(anchor_mass_g: f64, ca_si: f64, si_al: f64, na_al: f64) -> InverseRequest {
    let targets = TargetProfile::new([
        (RatioKind::CaSi, ca_si),
        (RatioKind::SiAl, si_al),
        (RatioKind::NaAl, na_al),
        (RatioKind::H2ONa2O, 12.5),
    ])
    .unwrap();
    InverseRequest {
        anchor: presets::ggbfs(),
        anchor_mass_g,
        complement: Some(presets::metakaolin()),
        alkaline: presets::naoh_solution(0.5),
        silicate: presets::sodium_silicate(0.335, 2.5),
        water: presets::water(),
        targets,
        options: SolverOptions::default(),
    }
}

#[test]
fn zero_mass_gives_zero_moles() {
    for material in all_presets() {
        assert!(moles_from_material(&material, 0.0).unwrap().is_zero(), "{}", material.name);
    }
}

proptest! {
    #[test]
    fn moles_scale_linearly_with_mass(mass in 0.0f64..10_000.0) {
        for material in all_presets() {
            let one = moles_from_material(&material, 1.0).unwrap();
            let m = moles_from_material(&material, mass).unwrap();
            let scaled = one.scaled(mass);
            prop_assert!((m.si - scaled.si).abs() <= 1e-9 * (1.0 + m.si));
            prop_assert!((m.na2o - scaled.na2o).abs() <= 1e-9 * (1.0 + m.na2o));
            prop_assert!((m.h2o - scaled.h2o).abs() <= 1e-9 * (1.0 + m.h2o));
        }
    }

    #[test]
    fn totals_are_never_negative(masses in prop::collection::vec(0.0f64..1000.0, 5)) {
        let mut mix = MixInput::new();
        for (material, mass) in all_presets().into_iter().zip(masses) {
            mix = mix.with(material, mass).unwrap();
        }
        let t = aggregate(&mix);
        prop_assert!(t.si >= 0.0 && t.al >= 0.0 && t.na2o >= 0.0 && t.ca >= 0.0 && t.h2o >= 0.0);
        for (_, value) in compute_forward(&mix).ratios.iter() {
            if let Some(v) = value {
                prop_assert!(v.is_finite() && v >= 0.0);
            }
        }
    }

    #[test]
    fn deviation_is_symmetric(target in 0.01f64..20.0, delta in 0.0f64..5.0) {
        let above = percent_deviation(target + delta, target).unwrap();
        let below = percent_deviation(target - delta, target).unwrap();
        prop_assert!(above >= 0.0);
        prop_assert!((above - below).abs() <= 1e-9 * (1.0 + above));
    }

    #[test]
    fn inverse_masses_are_never_negative(
        anchor in 10.0f64..1000.0,
        ca_si in 0.3f64..1.2,
        si_al in 2.0f64..4.0,
        na_al in 0.6f64..1.2,
    ) {
        let result = compute_inverse(&ggbfs_request(anchor, ca_si, si_al, na_al)).unwrap();
        prop_assert!(result.mix.entries().iter().all(|e| e.mass_g >= 0.0));
        if result.warnings.is_empty() {
            let ratios = compute_forward(&result.mix).ratios;
            for ratio in &result.honored {
                let target = result_target(*ratio, ca_si, si_al, na_al);
                let value = ratios.get(*ratio).unwrap();
                prop_assert!(((value - target) / target).abs() < 1e-6, "{ratio}: {value} vs {target}");
            }
        }
    }

    #[test]
    fn feasible_window_round_trips_without_clamping(
        anchor in 50.0f64..500.0,
        ca_si in 0.7f64..0.95,
    ) {
        let result = compute_inverse(&ggbfs_request(anchor, ca_si, 3.0, 0.9)).unwrap();
        prop_assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let ca_si_out = result.ratios.get(RatioKind::CaSi).unwrap();
        prop_assert!(((ca_si_out - ca_si) / ca_si).abs() < 1e-6);
    }
}

fn result_target(ratio: RatioKind, ca_si: f64, si_al: f64, na_al: f64) -> f64 {
    match ratio {
        RatioKind::CaSi => ca_si,
        RatioKind::SiAl => si_al,
        RatioKind::NaAl => na_al,
        _ => 12.5,
    }
}
