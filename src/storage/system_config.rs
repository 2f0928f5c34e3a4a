//! Scoring configuration and the persisted score map.
//!
//! Weights are stored as one numeric line each, in a fixed order; scores as
//! `username|score` lines. Both are rewritten in full after every mutation.

use std::{collections::BTreeMap, fs, io, path::PathBuf};

use crate::domain::Weights;

use super::{
    CONFIG_FILE, PERFORMANCE_SCORES_FILE,
    record::{self, ScoreRecord},
};

/// The eight individually settable weight parameters, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightField {
    /// Code-quality weight (development).
    CodeQuality,
    /// Teamwork weight, shared by all departments.
    Teamwork,
    /// Completed-tasks weight, shared by all departments.
    Tasks,
    /// Creativity weight (design).
    DesignCreativity,
    /// Campaign-ROI weight (marketing).
    MarketingRoi,
    /// Conversion weight (sales).
    SalesConversion,
    /// Customer-satisfaction weight (support).
    SupportSatisfaction,
    /// Bug-detection weight (QA).
    QaBugDetection,
}

impl WeightField {
    /// Every field, in the order the config file stores them.
    pub const ALL: [Self; 8] = [
        Self::CodeQuality,
        Self::Teamwork,
        Self::Tasks,
        Self::DesignCreativity,
        Self::MarketingRoi,
        Self::SalesConversion,
        Self::SupportSatisfaction,
        Self::QaBugDetection,
    ];

    /// Human-readable label, used by the configuration menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CodeQuality => "Code quality weight (Development)",
            Self::Teamwork => "Teamwork weight (all departments)",
            Self::Tasks => "Completed-tasks weight (all departments)",
            Self::DesignCreativity => "Creativity weight (Design)",
            Self::MarketingRoi => "Campaign-ROI weight (Marketing)",
            Self::SalesConversion => "Sales-conversion weight (Sales)",
            Self::SupportSatisfaction => "Customer-satisfaction weight (Support)",
            Self::QaBugDetection => "Bug-detection weight (QA)",
        }
    }
}

/// Scoring weights plus the username-to-score map, both file-backed.
pub struct SystemConfig {
    dir: PathBuf,
    weights: Weights,
    scores: BTreeMap<String, f64>,
}

impl SystemConfig {
    /// Open the configuration over the given data directory.
    ///
    /// A missing config file is created with the compiled-in defaults. A
    /// truncated config file is tolerated: weights the file does not reach
    /// keep their defaults.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let mut config = Self {
            dir: dir.into(),
            weights: Weights::default(),
            scores: BTreeMap::new(),
        };
        config.load_weights();
        config.load_scores();
        config
    }

    /// The current weight set.
    #[must_use]
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Read a single weight parameter.
    #[must_use]
    pub const fn weight(&self, field: WeightField) -> f64 {
        match field {
            WeightField::CodeQuality => self.weights.code_quality,
            WeightField::Teamwork => self.weights.teamwork,
            WeightField::Tasks => self.weights.tasks,
            WeightField::DesignCreativity => self.weights.design_creativity,
            WeightField::MarketingRoi => self.weights.marketing_roi,
            WeightField::SalesConversion => self.weights.sales_conversion,
            WeightField::SupportSatisfaction => self.weights.support_satisfaction,
            WeightField::QaBugDetection => self.weights.qa_bug_detection,
        }
    }

    /// Set a single weight parameter and persist the whole weight set.
    pub fn set_weight(&mut self, field: WeightField, value: f64) {
        let slot = match field {
            WeightField::CodeQuality => &mut self.weights.code_quality,
            WeightField::Teamwork => &mut self.weights.teamwork,
            WeightField::Tasks => &mut self.weights.tasks,
            WeightField::DesignCreativity => &mut self.weights.design_creativity,
            WeightField::MarketingRoi => &mut self.weights.marketing_roi,
            WeightField::SalesConversion => &mut self.weights.sales_conversion,
            WeightField::SupportSatisfaction => &mut self.weights.support_satisfaction,
            WeightField::QaBugDetection => &mut self.weights.qa_bug_detection,
        };
        *slot = value;
        self.persist_weights();
    }

    /// The weighted performance score for an employee of `department`.
    ///
    /// See [`Weights::calculate_performance`].
    #[must_use]
    pub fn calculate_performance(
        &self,
        department: &str,
        department_score: f64,
        teamwork_score: f64,
        tasks_score: f64,
    ) -> f64 {
        self.weights
            .calculate_performance(department, department_score, teamwork_score, tasks_score)
    }

    /// The specialized weight applying to `department`.
    #[must_use]
    pub fn department_weight(&self, department: &str) -> f64 {
        self.weights.department_weight(department)
    }

    /// Whether the weights for `department` sum to 100%.
    #[must_use]
    pub fn validate_department(&self, department: &str) -> bool {
        self.weights.validate_department(department)
    }

    /// Store (or replace) an employee's performance score and persist the
    /// score map.
    pub fn save_performance_score(&mut self, username: &str, score: f64) {
        self.scores.insert(username.to_string(), score);
        self.persist_scores();
    }

    /// An employee's stored score, or `-1.0` when none has been recorded.
    ///
    /// Absence is a normal state for never-evaluated employees, hence a
    /// sentinel rather than an error.
    #[must_use]
    pub fn performance_score(&self, username: &str) -> f64 {
        self.scores.get(username).copied().unwrap_or(-1.0)
    }

    /// Whether a score has been recorded for the user.
    #[must_use]
    pub fn has_performance_score(&self, username: &str) -> bool {
        self.scores.contains_key(username)
    }

    fn load_weights(&mut self) {
        let path = self.dir.join(CONFIG_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                // First run: materialise the defaults.
                self.persist_weights();
                return;
            }
            Err(error) => {
                tracing::error!("failed to read {}: {error}", path.display());
                return;
            }
        };

        let mut lines = content.lines();
        let slots: [&mut f64; 8] = [
            &mut self.weights.code_quality,
            &mut self.weights.teamwork,
            &mut self.weights.tasks,
            &mut self.weights.design_creativity,
            &mut self.weights.marketing_roi,
            &mut self.weights.sales_conversion,
            &mut self.weights.support_satisfaction,
            &mut self.weights.qa_bug_detection,
        ];
        for slot in slots {
            let Some(line) = lines.next() else {
                // Truncated file: remaining weights keep their defaults.
                break;
            };
            match line.trim().parse::<f64>() {
                Ok(value) => *slot = value,
                Err(error) => {
                    tracing::warn!(
                        "unreadable weight in {}: {error}; keeping defaults from here on",
                        path.display()
                    );
                    break;
                }
            }
        }
    }

    fn persist_weights(&self) {
        let path = self.dir.join(CONFIG_FILE);
        let weights = &self.weights;
        let content = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            weights.code_quality,
            weights.teamwork,
            weights.tasks,
            weights.design_creativity,
            weights.marketing_roi,
            weights.sales_conversion,
            weights.support_satisfaction,
            weights.qa_bug_detection,
        );
        if let Err(error) = fs::write(&path, content) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }

    fn load_scores(&mut self) {
        let records: Vec<ScoreRecord> =
            record::load_records(&self.dir.join(PERFORMANCE_SCORES_FILE));
        self.scores = records
            .into_iter()
            .map(|record| (record.username, record.score))
            .collect();
    }

    fn persist_scores(&self) {
        let path = self.dir.join(PERFORMANCE_SCORES_FILE);
        let records: Vec<ScoreRecord> = self
            .scores
            .iter()
            .map(|(username, &score)| ScoreRecord {
                username: username.clone(),
                score,
            })
            .collect();
        if let Err(error) = record::save_records(&path, &records) {
            tracing::error!("failed to write {}: {error}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn first_open_materialises_default_weights() {
        let tmp = TempDir::new().unwrap();
        let config = SystemConfig::open(tmp.path());

        assert!((config.weight(WeightField::Tasks) - 40.0).abs() < 1e-9);

        let written = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(written, "30\n30\n40\n30\n30\n30\n30\n30\n");
    }

    #[test]
    fn set_weight_persists_and_survives_a_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let mut config = SystemConfig::open(tmp.path());
            config.set_weight(WeightField::Teamwork, 25.5);
        }

        let reopened = SystemConfig::open(tmp.path());
        assert!((reopened.weight(WeightField::Teamwork) - 25.5).abs() < 1e-9);
    }

    #[test]
    fn a_truncated_config_keeps_trailing_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "10\n20\n30\n").unwrap();

        let config = SystemConfig::open(tmp.path());
        assert!((config.weight(WeightField::CodeQuality) - 10.0).abs() < 1e-9);
        assert!((config.weight(WeightField::Teamwork) - 20.0).abs() < 1e-9);
        assert!((config.weight(WeightField::Tasks) - 30.0).abs() < 1e-9);
        // Beyond the truncation point the compiled-in defaults apply.
        assert!((config.weight(WeightField::DesignCreativity) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn a_garbage_weight_stops_the_read_without_failing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "10\nnot-a-number\n99\n").unwrap();

        let config = SystemConfig::open(tmp.path());
        assert!((config.weight(WeightField::CodeQuality) - 10.0).abs() < 1e-9);
        // The unreadable line and everything after it fall back to defaults.
        assert!((config.weight(WeightField::Teamwork) - 30.0).abs() < 1e-9);
        assert!((config.weight(WeightField::Tasks) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn absent_scores_read_as_the_sentinel() {
        let tmp = TempDir::new().unwrap();
        let config = SystemConfig::open(tmp.path());

        assert!((config.performance_score("nobody") + 1.0).abs() < 1e-9);
        assert!(!config.has_performance_score("nobody"));
    }

    #[test]
    fn scores_are_upserted_and_persisted_in_username_order() {
        let tmp = TempDir::new().unwrap();
        let mut config = SystemConfig::open(tmp.path());

        config.save_performance_score("petrov", 64.5);
        config.save_performance_score("ivanov", 81.0);
        config.save_performance_score("petrov", 70.0);

        let written = fs::read_to_string(tmp.path().join(PERFORMANCE_SCORES_FILE)).unwrap();
        assert_eq!(written, "ivanov|81.00\npetrov|70.00\n");

        let reopened = SystemConfig::open(tmp.path());
        assert!((reopened.performance_score("ivanov") - 81.0).abs() < 1e-9);
        assert!((reopened.performance_score("petrov") - 70.0).abs() < 1e-9);
    }

    #[test]
    fn calculation_uses_the_configured_weights() {
        let tmp = TempDir::new().unwrap();
        let config = SystemConfig::open(tmp.path());

        let score = config.calculate_performance("Разработка", 80.0, 70.0, 90.0);
        assert!((score - 81.0).abs() < 1e-9);
    }
}
