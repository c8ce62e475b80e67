//! Integration tests for configuration loading

#[cfg(test)]
mod tests {
    use ossim_config::Config;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.resources.classes, 20);
        assert_eq!(config.workers.max_running, 18);
        assert_eq!(config.simulation.detection_interval_ns, 1_000_000_000);
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[resources]\nclasses = 5\nmax_instances = 3\n\n[workers]\nmax_launched = 10"
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.resources.classes, 5);
        assert_eq!(config.resources.max_instances, 3);
        assert_eq!(config.workers.max_launched, 10);
        // Unspecified fields keep their defaults
        assert_eq!(config.resources.min_instances, 1);
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = Config::load(std::path::Path::new("/nonexistent/ossim.toml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_or_default_without_path() {
        let config = Config::load_or_default(None).await.unwrap();
        assert_eq!(config.workers.max_running, 18);
    }

    #[test]
    fn test_validation_rejects_inverted_instance_range() {
        let mut config = Config::default();
        config.resources.min_instances = 9;
        config.resources.max_instances = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_probability() {
        let mut config = Config::default();
        config.workers.request_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_increment() {
        let mut config = Config::default();
        config.simulation.clock_increment_ns = 0;
        assert!(config.validate().is_err());
    }
}
