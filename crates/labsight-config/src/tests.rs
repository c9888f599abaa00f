#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.models.dir, PathBuf::from("models"));
        assert_eq!(config.features.sex_male_code, 1.0);
        assert_eq!(config.features.sex_female_code, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [models]
            dir = "/srv/labsight/models"
            "#,
        )
        .unwrap();
        assert_eq!(config.models.dir, PathBuf::from("/srv/labsight/models"));
        assert_eq!(config.server.bind, default_bind());
        assert_eq!(config.logging.filter, default_log_filter());
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"127.0.0.1:8080\"\n\n[features]\nsex_male_code = 2.0").unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
        assert_eq!(config.features.sex_male_code, 2.0);
        assert_eq!(config.features.sex_female_code, 0.0);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = Config::from_toml_str("[server\nbind = 1").unwrap_err();
        assert!(matches!(err, LabsightError::ConfigParse(_)));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            (BIND_ENV, "127.0.0.1:9000"),
            (MODEL_DIR_ENV, "/opt/models"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.models.dir, PathBuf::from("/opt/models"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.server.bind, default_bind());
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(matches!(config.validate(), Err(LabsightError::Config(_))));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.features.sex_female_code, default_female_code());
    }
}
