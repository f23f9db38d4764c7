// argus_sim/tests/scenario_run.rs

use std::fs;
use std::path::{Path, PathBuf};

use argus_sim::prelude::*;

fn assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets")
}

fn cli(scenario: PathBuf, catalog: PathBuf) -> Cli {
    Cli {
        scenario,
        catalog,
        seed: Some(5),
        ticks: Some(3),
        report: None,
        log_level: "info".into(),
    }
}

#[test]
fn test_bundled_scenario_runs() {
    let assets = assets();
    let cli = cli(
        assets.join("scenarios/00_intersection.toml"),
        assets.join("catalog"),
    );
    let summary = argus_sim::run(&cli).unwrap();
    assert_eq!(summary.ticks, 3);
    assert!(!summary.observers.is_empty());
    assert!(summary.vehicles > 0);
}

#[test]
fn test_bundled_catalog_covers_scenario() {
    let assets = assets();
    let scenario = ScenarioConfig::from_file(&assets.join("scenarios/00_intersection.toml")).unwrap();
    let catalog = VehicleCatalog::load(&assets.join("catalog")).unwrap();
    for key in &scenario.traffic.vehicle_types {
        assert!(catalog.get(key).is_some(), "missing catalog entry {key}");
    }
}

#[test]
fn test_report_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = dir.path().join("scenario.toml");
    fs::write(
        &scenario,
        r#"
        [world]
        origin_latitude = 52.5
        origin_longitude = 13.4
        extent = 60.0

        [traffic]
        vehicles = 20

        [[observers]]
        name = "ego"
        vehicle = "veh_0"
        viewing_angle = 120.0
        viewing_range = 60.0
        modifiers = [{ kind = "WallOcclusion" }]
        "#,
    )
    .unwrap();

    let report = dir.path().join("report.toml");
    let mut cli = cli(scenario, dir.path().join("no_catalog"));
    cli.report = Some(report.clone());
    let summary = argus_sim::run(&cli).unwrap();

    let written: toml::Value = toml::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(written["seed"].as_str(), Some("5"));
    assert_eq!(written["ticks"].as_integer(), Some(3));
    let observers = written["observers"].as_array().unwrap();
    assert_eq!(observers.len(), 1);
    assert_eq!(observers[0]["name"].as_str(), Some("ego"));
    assert_eq!(observers[0]["max"].as_integer(), Some(summary.observers[0].max as i64));
}

#[test]
fn test_missing_scenario_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cli = cli(dir.path().join("nope.toml"), dir.path().to_path_buf());
    assert!(matches!(argus_sim::run(&cli), Err(SimError::Io(_))));
}
