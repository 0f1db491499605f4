use std::path::PathBuf;

use blockworld_world::{ConfigError, WorldParams, load_params_from_path};

fn config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/world.toml")
}

#[test]
fn shipped_config_matches_defaults() {
    let params = load_params_from_path(&config_path()).unwrap();
    assert_eq!(params, WorldParams::default());
}

#[test]
fn missing_file_is_io_error() {
    let err = load_params_from_path(&config_path().with_file_name("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
