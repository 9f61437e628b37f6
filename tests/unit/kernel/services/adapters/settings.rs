use super::*;
use crate::kernel::services::adapters::file::LocalFileSystem;
use crate::kernel::services::ports::settings::ThemeMode;
use crate::test_support::block_on;

fn store_in(dir: &std::path::Path) -> SettingsStore {
    SettingsStore::with_dir(
        Arc::new(LocalFileSystem::new()),
        Some(dir.join("xide")),
    )
}

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    let settings = block_on(store.restore()).unwrap();

    assert_eq!(settings, Settings::default());
    let written = std::fs::read_to_string(dir.path().join("xide").join(SETTINGS_FILE)).unwrap();
    assert!(written.starts_with("# xide configuration"));
    assert!(written.contains("font_size = 14"));
}

#[test]
fn partial_file_is_merged_and_init_writes_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("xide");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join(SETTINGS_FILE),
        "[editor]\nfont_size = 18\ntheme_mode = \"light\"\n",
    )
    .unwrap();
    let store = store_in(dir.path());

    let settings = block_on(store.init()).unwrap();

    assert_eq!(settings.editor.font_size, 18);
    assert_eq!(settings.editor.theme_mode, ThemeMode::Light);
    assert_eq!(settings.editor.dark_theme, "houston");
    assert_eq!(store.settings(), settings);
    let written = std::fs::read_to_string(config_dir.join(SETTINGS_FILE)).unwrap();
    assert!(written.contains("font_size = 18"));
    assert!(written.contains("mistralai/codestral-2501"));
}

#[test]
fn invalid_file_is_an_error_and_keeps_previous_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("xide");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(SETTINGS_FILE), "[editor\nfont_size = ").unwrap();
    let store = store_in(dir.path());

    let err = block_on(store.restore()).unwrap_err();

    assert!(matches!(err, SettingsError::Parse(_)));
    assert_eq!(store.settings(), Settings::default());
}

#[test]
fn update_rejects_invalid_settings() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    let mut settings = Settings::default();
    settings.editor.light_theme = "solarized".to_string();

    assert!(block_on(store.update(settings)).is_err());
    assert_eq!(store.settings(), Settings::default());
}

#[test]
fn settings_path_requires_a_config_dir() {
    let store = SettingsStore::with_dir(Arc::new(LocalFileSystem::new()), None);
    assert!(matches!(
        block_on(store.settings_path()),
        Err(SettingsError::NoConfigDir)
    ));
}
