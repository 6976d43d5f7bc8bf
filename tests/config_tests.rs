use std::path::PathBuf;

use waddle_cad::{
    CadError,
    config::{Config, ExportFormat},
    float_types::DEFAULT_SEGMENTS,
    parts::{ReferenceModel, Waddle, WaddleAlt},
};

#[test]
fn empty_file_gives_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.output.directory, PathBuf::from("./output"));
    assert_eq!(config.output.format, ExportFormat::Step);
    assert_eq!(config.mesh.segments, DEFAULT_SEGMENTS);
    assert_eq!(config.mesh.tolerance, None);
    assert_eq!(config.waddle, Waddle::default());
    assert_eq!(config.waddle_alt, WaddleAlt::default());
    assert!(config.references.switch.is_none());
}

#[test]
fn tables_override_single_fields() {
    let config = Config::from_toml_str(
        r#"
        [output]
        format = "both"

        [mesh]
        segments = 12

        [waddle]
        cols = 10
        lip = 18.5

        [waddle_alt]
        split = true

        [references]
        switch = "models/cherry_mx.stl"
        "#,
    )
    .unwrap();

    assert_eq!(config.output.format, ExportFormat::Both);
    assert_eq!(config.output.directory, PathBuf::from("./output"));
    assert_eq!(config.mesh.segments, 12);
    assert_eq!(config.waddle.cols, 10);
    assert_eq!(config.waddle.rows, 4);
    assert_eq!(config.waddle.lip, 18.5);
    assert!(config.waddle_alt.split);

    let models = config.references.models();
    assert_eq!(models.switch, ReferenceModel::Stl(PathBuf::from("models/cherry_mx.stl")));
    assert_eq!(models.keycap, ReferenceModel::dsa_1u_proxy());
}

#[test]
fn apply_pushes_segments_into_generators() {
    let mut config = Config::from_toml_str("[mesh]\nsegments = 9\n[waddle]\nsegments = 64\n").unwrap();
    config.apply();
    assert_eq!(config.waddle.segments, 9);
    assert_eq!(config.waddle_alt.segments, 9);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        Config::from_toml_str("[mesh]\nsegments = 2\n"),
        Err(CadError::Config(_))
    ));
    assert!(matches!(
        Config::from_toml_str("[mesh]\ntolerance = -1.0\n"),
        Err(CadError::InvalidDimension { .. })
    ));
    assert!(matches!(
        Config::from_toml_str("[waddle_alt]\nrows = 0\n"),
        Err(CadError::Config(_))
    ));
    assert!(matches!(
        Config::from_toml_str("[output]\nformat = \"obj\"\n"),
        Err(CadError::Config(_))
    ));
    assert!(matches!(Config::from_toml_str("[mesh"), Err(CadError::Config(_))));
}

#[test]
fn load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waddle.toml");
    std::fs::write(&path, "[output]\ndirectory = \"out\"\nformat = \"stl\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.output.directory, PathBuf::from("out"));
    assert_eq!(config.output.format, ExportFormat::Stl);

    let missing = Config::load(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(CadError::Io { .. })));
}

#[test]
fn export_format_extensions() {
    assert_eq!(ExportFormat::default().extensions(), ["step"]);
    assert_eq!(ExportFormat::Stl.extensions(), ["stl"]);
    assert_eq!(ExportFormat::Both.extensions(), ["step", "stl"]);
}
