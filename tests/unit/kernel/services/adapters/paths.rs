use super::*;

#[test]
fn log_dir_is_app_scoped() {
    let dir = get_log_dir();
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.ends_with(LOG_DIR));
}

#[test]
fn config_dir_ends_with_app_name() {
    let dir = get_config_dir().unwrap();
    assert!(dir.ends_with(APP_NAME));
}
