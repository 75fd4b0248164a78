/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use json3vtt::app_config::{Config, ConversionConfig, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.output_extension, "vtt");
    assert_eq!(config.input_extensions, vec!["json3".to_string()]);
    assert_eq!(config.concurrent_files, 4);
    assert_eq!(config.conversion.merge_repeats_within_ms, None);
    assert!(config.conversion.escape_text);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.concurrent_files = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.output_extension = ".".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.input_extensions.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.input_extensions = vec!["json3".to_string(), "VTT".to_string()];
    assert!(config.validate().is_err());
}

/// Partial config files fall back to defaults for missing fields
#[test]
fn test_config_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "json3vtt.json",
        r#"{"log_level":"debug","conversion":{"merge_repeats_within_ms":300}}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.conversion.merge_repeats_within_ms, Some(300));
    assert!(config.conversion.escape_text);
    assert_eq!(config.output_extension, "vtt");

    Ok(())
}

/// Saved configs load back unchanged
#[test]
fn test_config_saveThenLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("saved.json");

    let mut config = Config::default();
    config.concurrent_files = 2;
    config.conversion.escape_text = false;
    config.save(&path)?;

    assert_eq!(Config::from_file(&path)?, config);
    Ok(())
}

/// Broken or missing config files are errors
#[test]
fn test_config_fromFile_withInvalidFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "{ log_level: ")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Conversion settings map onto pipeline options
#[test]
fn test_conversionConfig_options_shouldMirrorSettings() {
    let settings = ConversionConfig {
        merge_repeats_within_ms: Some(250),
        escape_text: false,
    };
    let options = settings.options();
    assert_eq!(options.reconcile.merge_repeats_within_ms, Some(250));
    assert!(!options.serialize.escape_text);
}

/// Log levels map onto log crate filters
#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
}
