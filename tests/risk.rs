use geopolymer_mix::chemistry::MoleTotals;
use geopolymer_mix::design::{
    classify_risk, ratios_from_totals, DisplayPrecision, EfflorescenceRisk, Pressability,
    RatioKind, RatioSet, TargetProfile, TierStrategy,
};

/// Al = 1 mol 기준으로 Na/Al, H2O/Na2O, H2O/SiO2를 맞춘 몰비 집합.
fn ratios(na_al: f64, h2o_na2o: f64, h2o_sio2: f64) -> RatioSet {
    let na2o = na_al / 2.0;
    let h2o = h2o_na2o * na2o;
    ratios_from_totals(&MoleTotals {
        al: 1.0,
        na2o,
        h2o,
        si: h2o / h2o_sio2,
        ca: 0.0,
    })
}

#[test]
fn moderate_alkali_and_dilution_is_low_risk() {
    let r = ratios(0.85, 10.0, 0.22);
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, Some(EfflorescenceRisk::Low));
    assert_eq!(risk.pressability, Some(Pressability::Good));
}

#[test]
fn excess_sodium_is_high_risk() {
    let r = ratios(1.2, 10.0, 0.22);
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, Some(EfflorescenceRisk::High));
}

#[test]
fn excess_water_is_high_risk() {
    let r = ratios(0.85, 13.5, 0.30);
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, Some(EfflorescenceRisk::High));
    assert_eq!(risk.pressability, Some(Pressability::ModerateWet));
}

#[test]
fn threshold_limits_are_inclusive() {
    let r = ratios(1.0, 13.0, 0.15);
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, Some(EfflorescenceRisk::Low));
    assert_eq!(risk.pressability, Some(Pressability::PoorDry));
}

#[test]
fn undefined_ratios_leave_risk_unevaluated() {
    let r = ratios_from_totals(&MoleTotals::default());
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, None);
    assert_eq!(risk.pressability, None);
}

#[test]
fn missing_sodium_leaves_efflorescence_unevaluated() {
    // Na2O가 없으면 Na/Al = 0 이고 H2O/Na2O는 정의되지 않는다.
    let r = ratios_from_totals(&MoleTotals {
        al: 1.0,
        si: 2.0,
        h2o: 1.0,
        ..MoleTotals::default()
    });
    assert_eq!(r.get(RatioKind::H2ONa2O), None);
    let risk = classify_risk(&r, TierStrategy::Threshold, &TargetProfile::literature());
    assert_eq!(risk.efflorescence, None);
    assert_eq!(risk.pressability, Some(Pressability::ModerateWet));
}

#[test]
fn deviation_count_tiers() {
    let targets = TargetProfile::new([
        (RatioKind::NaAl, 0.9),
        (RatioKind::H2ONa2O, 12.5),
        (RatioKind::H2OSiO2, 0.225),
    ])
    .unwrap();
    let tier = TierStrategy::DeviationCount {
        limit_pct: 10.0,
        precision: DisplayPrecision::Whole,
    };

    let on_target = ratios(0.9, 12.5, 0.225);
    assert_eq!(
        classify_risk(&on_target, tier, &targets).efflorescence,
        Some(EfflorescenceRisk::Low)
    );

    let one_off = ratios(0.9, 12.5, 0.30);
    assert_eq!(
        classify_risk(&one_off, tier, &targets).efflorescence,
        Some(EfflorescenceRisk::Moderate)
    );

    let two_off = ratios(1.2, 12.5, 0.30);
    assert_eq!(
        classify_risk(&two_off, tier, &targets).efflorescence,
        Some(EfflorescenceRisk::High)
    );
}

#[test]
fn deviation_count_treats_undefined_as_exceeding() {
    let targets = TargetProfile::new([(RatioKind::SiAl, 3.0)]).unwrap();
    let r = ratios_from_totals(&MoleTotals::default());
    let tier = TierStrategy::DeviationCount {
        limit_pct: 10.0,
        precision: DisplayPrecision::Full,
    };
    let risk = classify_risk(&r, tier, &targets);
    assert_eq!(risk.efflorescence, Some(EfflorescenceRisk::Moderate));
}

#[test]
fn deviation_count_compares_rounded_percent() {
    // Si/Al 3.3012 → 목표 3.0 대비 10.04 %
    let targets = TargetProfile::new([(RatioKind::SiAl, 3.0)]).unwrap();
    let r = ratios_from_totals(&MoleTotals {
        si: 3.3012,
        al: 1.0,
        ..MoleTotals::default()
    });
    let tier = |precision| TierStrategy::DeviationCount {
        limit_pct: 10.0,
        precision,
    };
    let level = |precision| classify_risk(&r, tier(precision), &targets).efflorescence;
    assert_eq!(level(DisplayPrecision::Whole), Some(EfflorescenceRisk::Low));
    assert_eq!(level(DisplayPrecision::OneDecimal), Some(EfflorescenceRisk::Low));
    assert_eq!(level(DisplayPrecision::Full), Some(EfflorescenceRisk::Moderate));
}
