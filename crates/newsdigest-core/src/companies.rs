use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::ConfigError;

/// One company tracked by the per-company sub-runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    /// Search term override; defaults to `name`.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CompanyConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: None,
            notes: None,
        }
    }

    /// The term sent to the listing source.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(&self.name)
    }

    /// Generate a URL-safe slug from the company name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct CompaniesFile {
    pub companies: Vec<CompanyConfig>,
}

/// Load and validate the company list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_companies(path: &Path) -> Result<CompaniesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompaniesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let companies_file: CompaniesFile = serde_yaml::from_str(&content)?;
    validate_companies(&companies_file.companies)?;

    Ok(companies_file)
}

/// Resolve the company list for a run.
///
/// `NEWSDIGEST_COMPANIES` wins over the YAML file when set, so a run can be
/// retargeted without editing config files.
///
/// # Errors
///
/// Returns `ConfigError` if the file is needed and cannot be loaded, or if the
/// resulting list fails validation.
pub fn resolve_companies(config: &AppConfig) -> Result<Vec<CompanyConfig>, ConfigError> {
    if let Some(names) = &config.companies_override {
        let companies: Vec<CompanyConfig> = names.iter().map(CompanyConfig::new).collect();
        validate_companies(&companies)?;
        return Ok(companies);
    }
    Ok(load_companies(&config.companies_path)?.companies)
}

fn validate_companies(companies: &[CompanyConfig]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for company in companies {
        if company.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "company name must be non-empty".to_string(),
            ));
        }

        let slug = company.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "company '{}' produces an empty slug",
                company.name
            )));
        }

        if !seen_names.insert(company.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate company name: '{}'",
                company.name
            )));
        }

        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate company slug: '{}' (from company '{}')",
                slug, company.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "companies_test.rs"]
mod tests;
