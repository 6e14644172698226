//! Tests for resolving environment toggles.

use chainpack_config::{ProfileLevel, SpeedMeasureOutput, SynthesisOptions};
use figment::Jail;
use serial_test::serial;

#[test]
#[serial]
fn unset_environment_keeps_defaults() {
    Jail::expect_with(|_jail| {
        let options = SynthesisOptions::from_env().map_err(|e| e.to_string())?;
        assert!(options.progress);
        assert!(options.friendly_errors);
        assert!(options.compress);
        assert!(options.minifier_cache);
        assert!(options.profile.is_none());
        assert!(options.speed_measure.is_none());
        Ok(())
    });
}

#[test]
#[serial]
fn none_values_disable_toggles() {
    Jail::expect_with(|jail| {
        jail.set_env("PROGRESS", "none");
        jail.set_env("FRIENDLY_ERROR", "none");
        jail.set_env("COMPRESS", "none");
        jail.set_env("TERSER_CACHE", "none");

        let options = SynthesisOptions::from_env().map_err(|e| e.to_string())?;
        assert!(!options.progress);
        assert!(!options.friendly_errors);
        assert!(!options.compress);
        assert!(!options.minifier_cache);
        Ok(())
    });
}

#[test]
#[serial]
fn profile_and_measurement_toggles() {
    Jail::expect_with(|jail| {
        jail.set_env("WEBPACK_PROFILE", "verbose");
        jail.set_env("SPEED_MEASURE", "CONSOLE");
        jail.set_env("APP_ROOT", "1");

        let options = SynthesisOptions::from_env().map_err(|e| e.to_string())?;
        assert_eq!(options.profile, Some(ProfileLevel::Verbose));
        assert_eq!(options.speed_measure, Some(SpeedMeasureOutput::Console));
        assert!(options.app_root);
        Ok(())
    });
}

#[test]
#[serial]
fn speed_measure_defaults_to_json_report() {
    Jail::expect_with(|jail| {
        jail.set_env("SPEED_MEASURE", "json");

        let options = SynthesisOptions::from_env().map_err(|e| e.to_string())?;
        match options.speed_measure {
            Some(SpeedMeasureOutput::Json(path)) => {
                assert!(path.ends_with("speed-measure.json"));
            }
            other => panic!("unexpected measurement output: {other:?}"),
        }
        Ok(())
    });
}

#[test]
#[serial]
fn app_prefixed_variables_are_collected() {
    Jail::expect_with(|jail| {
        jail.set_env("CHAINPACK_APP_API_URL", "https://example.com");
        jail.set_env("UNRELATED_VAR", "ignored");

        let options = SynthesisOptions::from_env().map_err(|e| e.to_string())?;
        assert_eq!(
            options.app_env.get("CHAINPACK_APP_API_URL").map(String::as_str),
            Some("https://example.com")
        );
        assert!(!options.app_env.contains_key("UNRELATED_VAR"));
        Ok(())
    });
}
