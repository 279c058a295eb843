//! Metric catalog used to parameterize synthetic generation

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HealthError, Result};

/// Name of the life-expectancy indicator in the built-in catalog
pub const LIFE_EXPECTANCY: &str = "Life Expectancy";

/// Name of the under-five mortality indicator in the built-in catalog
pub const UNDER5_MORTALITY: &str = "Under-5 Mortality Rate";

/// Generation parameters for one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub unit: String,
    /// Lower end of the plausible range
    pub min: f64,
    /// Upper end of the plausible range
    pub max: f64,
    /// Change per year since 2000
    pub annual_trend: f64,
}

impl MetricSpec {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        range: (f64, f64),
        annual_trend: f64,
    ) -> Result<Self> {
        let spec = Self {
            name: name.into(),
            unit: unit.into(),
            min: range.0,
            max: range.1,
            annual_trend,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| HealthError::CatalogInvalid {
            metric: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("metric name is empty".to_string()));
        }
        if !self.min.is_finite() || !self.max.is_finite() || !self.annual_trend.is_finite() {
            return Err(invalid("range and trend must be finite".to_string()));
        }
        if self.min > self.max {
            return Err(invalid(format!("min ({}) is greater than max ({})", self.min, self.max)));
        }
        if self.max < 0.0 {
            return Err(invalid(format!("max ({}) must not be negative", self.max)));
        }
        Ok(())
    }

    /// Clamp bounds applied to generated values
    pub fn clamp_bounds(&self) -> (f64, f64) {
        (self.min * 0.8, self.max * 1.1)
    }

    /// Standard deviation of the yearly noise term
    pub fn noise_sd(&self) -> f64 {
        self.max * 0.02
    }
}

/// Ordered, immutable collection of metric specs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCatalog {
    metrics: Vec<MetricSpec>,
}

impl MetricCatalog {
    /// Build a catalog, rejecting invalid or duplicated entries
    pub fn new(metrics: Vec<MetricSpec>) -> Result<Self> {
        for (idx, spec) in metrics.iter().enumerate() {
            spec.validate()?;
            if metrics[..idx].iter().any(|m| m.name == spec.name) {
                return Err(HealthError::CatalogInvalid {
                    metric: spec.name.clone(),
                    reason: "duplicate metric name".to_string(),
                });
            }
        }
        Ok(Self { metrics })
    }

    /// The ten indicators shown on the dashboard
    pub fn builtin() -> Self {
        let spec = |name: &str, unit: &str, min: f64, max: f64, trend: f64| MetricSpec {
            name: name.to_string(),
            unit: unit.to_string(),
            min,
            max,
            annual_trend: trend,
        };

        Self {
            metrics: vec![
                spec(LIFE_EXPECTANCY, "years", 50.0, 85.0, 0.15),
                spec(UNDER5_MORTALITY, "per 1000", 2.0, 150.0, -0.8),
                spec("Maternal Mortality Ratio", "per 100000", 5.0, 500.0, -2.5),
                spec("Vaccination Coverage (DTP3)", "%", 40.0, 99.0, 0.3),
                spec("Hospital Beds per 1000", "beds", 0.5, 15.0, 0.05),
                spec("Physicians per 10000", "doctors", 1.0, 40.0, 0.2),
                spec("Health Expenditure (% of GDP)", "%", 2.0, 12.0, 0.1),
                spec("Adult Obesity Rate", "%", 5.0, 40.0, 0.1),
                spec("Smoking Prevalence", "%", 10.0, 50.0, -0.2),
                spec("Access to Clean Water", "%", 50.0, 100.0, 0.25),
            ],
        }
    }

    /// Load a catalog from a TOML file with `[[metrics]]` entries
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: MetricCatalog = toml::from_str(content)
            .map_err(|e| HealthError::Serialization(format!("Failed to parse catalog: {}", e)))?;
        Self::new(file.metrics)
    }

    pub fn get(&self, name: &str) -> Option<&MetricSpec> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSpec> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = MetricCatalog::builtin();
        assert_eq!(catalog.len(), 10);

        let first = catalog.iter().next().unwrap();
        assert_eq!(first.name, LIFE_EXPECTANCY);

        let u5 = catalog.get(UNDER5_MORTALITY).unwrap();
        assert_eq!(u5.unit, "per 1000");
        let (lo, hi) = u5.clamp_bounds();
        assert!((lo - 1.6).abs() < 1e-9);
        assert!((hi - 165.0).abs() < 1e-9);
        assert!((u5.noise_sd() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = MetricCatalog::builtin();
        let rebuilt = MetricCatalog::new(catalog.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = MetricSpec::new("Broken", "%", (10.0, 5.0), 0.0);
        assert!(matches!(result, Err(HealthError::CatalogInvalid { .. })));

        let result = MetricSpec::new("Infinite", "%", (0.0, f64::INFINITY), 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let spec = MetricSpec::new("Beds", "beds", (1.0, 2.0), 0.0).unwrap();
        let result = MetricCatalog::new(vec![spec.clone(), spec]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = MetricCatalog::from_toml_str(
            r#"
[[metrics]]
name = "Dentists per 10000"
unit = "dentists"
min = 0.5
max = 12.0
annual_trend = 0.05
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Dentists per 10000").unwrap().max, 12.0);
    }
}
