use geopolymer_mix::chemistry::Oxide;
use geopolymer_mix::config::{load_or_default, Config, ConfigError};
use geopolymer_mix::design::{
    compute_inverse, DisplayPrecision, RatioKind, SolveChain, TierStrategy,
};
use geopolymer_mix::units::MassUnit;

const SMALL_CONFIG: &str = r#"
mass_unit = "kilogram"

[targets]
"Si/Al" = 3.0
"Na/Al" = 0.9
"H2O/Na2O" = 12.5
"Ca/Si" = 0.8

[solver]
chain = "calcium_led"
tier = { kind = "deviation_count", limit_pct = 15.0, precision = "one_decimal" }

[[materials]]
name = "slag"
role = "solid_precursor"
oxides = { SiO2 = 0.365, Al2O3 = 0.104, Na2O = 0.005, CaO = 0.424 }

[[materials]]
name = "mk"
role = "solid_precursor"
oxides = { SiO2 = 0.57, Al2O3 = 0.265, Na2O = 0.09 }

[[materials]]
name = "naoh"
role = "alkaline_solution"
solids_fraction = 0.5

[[materials]]
name = "silicate"
role = "silicate_solution"
solids_fraction = 0.335
modulus = 2.5

[[materials]]
name = "water"
role = "free_water"

[[mix]]
material = "mk"
mass = 0.3

[[mix]]
material = "water"
mass = 0.05

[inverse]
anchor = "slag"
anchor_mass = 0.2
complement = "mk"
alkaline = "naoh"
silicate = "silicate"
water = "water"
"#;

#[test]
fn default_config_survives_toml_round_trip() {
    let original = Config::default();
    let text = original.to_toml().expect("serialize");
    let parsed = Config::from_toml(&text).expect("parse");
    assert_eq!(parsed.materials, original.materials);
    assert_eq!(parsed.targets, original.targets);
    assert_eq!(parsed.solver, original.solver);
    assert_eq!(parsed.mix, original.mix);
    assert_eq!(parsed.inverse, original.inverse);
    assert_eq!(parsed.mass_unit, original.mass_unit);
}

#[test]
fn hand_written_config_is_read() {
    let cfg = Config::from_toml(SMALL_CONFIG).expect("parse");
    assert_eq!(cfg.mass_unit, MassUnit::Kilogram);
    assert_eq!(cfg.targets.len(), 4);
    assert_eq!(cfg.targets.get(RatioKind::SiO2Na2O), None);
    assert_eq!(cfg.solver.chain, SolveChain::CalciumLed);
    assert_eq!(
        cfg.solver.tier,
        TierStrategy::DeviationCount {
            limit_pct: 15.0,
            precision: DisplayPrecision::OneDecimal,
        }
    );
    let slag = cfg.material("slag").unwrap();
    assert_eq!(slag.oxide_fraction(Oxide::CaO), 0.424);
}

#[test]
fn deviation_tier_limit_defaults_to_ten_percent() {
    let text = SMALL_CONFIG.replace(
        "tier = { kind = \"deviation_count\", limit_pct = 15.0, precision = \"one_decimal\" }",
        "tier = { kind = \"deviation_count\" }",
    );
    let cfg = Config::from_toml(&text).unwrap();
    assert_eq!(
        cfg.solver.tier,
        TierStrategy::DeviationCount {
            limit_pct: 10.0,
            precision: DisplayPrecision::Whole,
        }
    );
}

#[test]
fn masses_are_converted_to_grams() {
    let cfg = Config::from_toml(SMALL_CONFIG).unwrap();
    let mix = cfg.mix_input().unwrap();
    assert!((mix.mass_of("mk").unwrap() - 300.0).abs() < 1e-9);
    assert!((mix.mass_of("water").unwrap() - 50.0).abs() < 1e-9);

    let req = cfg.inverse_request(None).unwrap();
    assert!((req.anchor_mass_g - 200.0).abs() < 1e-9);
    let req = cfg.inverse_request(Some(1.0)).unwrap();
    assert!((req.anchor_mass_g - 1000.0).abs() < 1e-9);
}

#[test]
fn configured_inverse_request_solves() {
    let cfg = Config::default();
    let result = compute_inverse(&cfg.inverse_request(None).unwrap()).expect("solve");
    assert!(result.warnings.is_empty());
    assert_eq!(result.mix.mass_of("ggbfs"), Some(200.0));
}

#[test]
fn misspelled_oxide_is_rejected() {
    let text = SMALL_CONFIG.replace("Al2O3 = 0.104", "Al22O3 = 0.104");
    let err = Config::from_toml(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)), "{err}");
    assert!(err.to_string().contains("Al22O3"));
}

#[test]
fn unknown_ratio_label_is_rejected() {
    let text = SMALL_CONFIG.replace("\"Ca/Si\" = 0.8", "\"Ca/Al\" = 0.8");
    assert!(matches!(
        Config::from_toml(&text).unwrap_err(),
        ConfigError::Serde(_)
    ));
}

#[test]
fn misspelled_section_or_key_is_rejected() {
    for (from, to) in [
        ("[targets]", "[targest]"),
        ("chain = \"calcium_led\"", "chian = \"calcium_led\""),
        ("anchor_mass = 0.2", "anchor_mas = 0.2"),
        ("mass = 0.05", "mas = 0.05"),
    ] {
        let text = SMALL_CONFIG.replacen(from, to, 1);
        assert!(
            matches!(Config::from_toml(&text), Err(ConfigError::Serde(_))),
            "{to} accepted"
        );
    }
}

#[test]
fn oxide_sum_over_one_is_rejected() {
    let text = SMALL_CONFIG.replace("SiO2 = 0.57", "SiO2 = 0.9");
    assert!(Config::from_toml(&text).is_err());
}

#[test]
fn unknown_material_reference_is_reported() {
    let text = SMALL_CONFIG.replace("anchor = \"slag\"", "anchor = \"fly_ash\"");
    let cfg = Config::from_toml(&text).unwrap();
    match cfg.inverse_request(None) {
        Err(ConfigError::UnknownMaterial(name)) => assert_eq!(name, "fly_ash"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = std::env::temp_dir().join(format!("geopolymer_mix_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("geopolymer.toml");
    let _ = std::fs::remove_file(&path);

    let cfg = load_or_default(&path).expect("create");
    assert!(path.exists());
    let reloaded = load_or_default(&path).expect("reload");
    assert_eq!(reloaded.materials, cfg.materials);

    let _ = std::fs::remove_dir_all(&dir);
}
