pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points directly at a configuration file
pub const CONFIG_PATH_ENV: &str = "LAMBDA_DEPLOY_CONFIG";

const CANDIDATES: [&str; 3] = ["lambda.json", "lambda.yaml", "lambda.yml"];
const CONFIG_DIR: &str = ".lambda-deploy";

/// Deployment configuration, loaded once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Application name, used in bucket/key/stack names
    pub name: String,

    /// Default region list, in deployment order
    #[serde(default)]
    pub regions: Vec<String>,

    /// Desired infrastructure template
    #[serde(rename = "cloudFormation")]
    pub cloud_formation: serde_json::Value,
}

impl DeployConfig {
    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("`name` must not be empty"));
        }
        if !self.cloud_formation.is_object() {
            return Err(invalid("`cloudFormation` must be a mapping"));
        }
        if self.regions.iter().any(|r| r.trim().is_empty()) {
            return Err(invalid("`regions` must not contain empty entries"));
        }
        Ok(())
    }
}

/// Locate the configuration file
///
/// Search order:
/// 1. `explicit` (the `--config` flag), then `LAMBDA_DEPLOY_CONFIG`
/// 2. current directory: lambda.json, lambda.yaml, lambda.yml
/// 3. ./.lambda-deploy/ directory, same order
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::PathNotFound(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at {}, which does not exist",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let config_dir = current_dir.join(CONFIG_DIR);
    if config_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = config_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Load and validate a configuration file. YAML is chosen by extension.
pub fn load_config(path: &Path) -> Result<DeployConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(path, &content)?;
    config.validate(path)?;

    tracing::debug!(
        "Loaded {} from {} ({} default regions)",
        config.name,
        path.display(),
        config.regions.len()
    );
    Ok(config)
}

/// Find and load the configuration in one step
pub fn discover(explicit: Option<&Path>) -> Result<(PathBuf, DeployConfig)> {
    let path = find_config_file(explicit)?;
    let config = load_config(&path)?;
    Ok((path, config))
}

fn parse_config(path: &Path, content: &str) -> Result<DeployConfig> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const JSON_CONFIG: &str = r#"{
        "name": "svc",
        "regions": ["us-east-1", "eu-west-1"],
        "cloudFormation": {
            "Resources": { "Function": { "Type": "AWS::Lambda::Function" } },
            "Outputs": { "FunctionName": { "Value": { "Ref": "Function" } } }
        }
    }"#;

    const YAML_CONFIG: &str = r#"
name: svc
regions:
  - us-east-1
  - eu-west-1
cloudFormation:
  Outputs:
    FunctionName:
      Value:
        Ref: Function
  Resources:
    Function:
      Type: AWS::Lambda::Function
"#;

    #[test]
    fn test_load_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lambda.json");
        fs::write(&path, JSON_CONFIG).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.name, "svc");
        assert_eq!(config.regions, vec!["us-east-1", "eu-west-1"]);
        assert!(config.cloud_formation["Resources"]["Function"].is_object());
    }

    #[test]
    fn test_yaml_and_json_are_equivalent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let json = temp_dir.path().join("lambda.json");
        let yaml = temp_dir.path().join("lambda.yaml");
        fs::write(&json, JSON_CONFIG).unwrap();
        fs::write(&yaml, YAML_CONFIG).unwrap();

        assert_eq!(load_config(&json).unwrap(), load_config(&yaml).unwrap());
    }

    #[test]
    fn test_regions_default_to_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lambda.json");
        fs::write(&path, r#"{"name": "svc", "cloudFormation": {}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_template_must_be_mapping() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lambda.json");
        fs::write(&path, r#"{"name": "svc", "cloudFormation": "nope"}"#).unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_empty_name_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lambda.json");
        fs::write(&path, r#"{"name": " ", "cloudFormation": {}}"#).unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lambda.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_explicit_path_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("custom.json");

        assert!(matches!(
            find_config_file(Some(&missing)),
            Err(ConfigError::PathNotFound(_))
        ));
    }

    #[test]
    #[serial]
    fn test_find_config_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("lambda.json"), JSON_CONFIG).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_PATH_ENV, || find_config_file(None));

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("lambda.json"));
    }

    #[test]
    #[serial]
    fn test_json_preferred_over_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("lambda.yaml"), YAML_CONFIG).unwrap();
        fs::write(temp_dir.path().join("lambda.json"), JSON_CONFIG).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_PATH_ENV, || find_config_file(None));

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("lambda.json"));
    }

    #[test]
    #[serial]
    fn test_find_config_in_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let config_dir = temp_dir.path().join(CONFIG_DIR);
        fs::create_dir(&config_dir).unwrap();
        fs::write(config_dir.join("lambda.yml"), YAML_CONFIG).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_PATH_ENV, || find_config_file(None));

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with(".lambda-deploy/lambda.yml"));
    }

    #[test]
    #[serial]
    fn test_find_config_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.json");
        fs::write(&config_path, JSON_CONFIG).unwrap();

        let result = temp_env::with_var(CONFIG_PATH_ENV, Some(&config_path), || {
            find_config_file(None)
        });
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_find_config_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();
        let result = temp_env::with_var_unset(CONFIG_PATH_ENV, || find_config_file(None));
        std::env::set_current_dir(original_dir).unwrap();

        if let Err(ConfigError::ConfigFileNotFound) = result {
            // expected
        } else {
            panic!("Expected ConfigFileNotFound error");
        }
    }
}
