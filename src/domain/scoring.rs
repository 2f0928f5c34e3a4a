//! The weighted performance-scoring model.
//!
//! Every employee is scored from three components: a department-specific
//! metric, teamwork and completed tasks. Each component contributes a
//! configurable percentage weight; the department metric is selected by
//! classifying the free-text department name.

use super::project::{Assignment, Project};

/// Department categories recognised by the scoring model.
///
/// Classification is a case-insensitive substring match against a fixed,
/// ordered set of keyword groups (Russian and English spellings). `HR` is an
/// exact match only; anything unrecognised falls back to the development
/// metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    /// Software development.
    Development,
    /// Design.
    Design,
    /// Marketing.
    Marketing,
    /// Sales.
    Sales,
    /// Customer support.
    Support,
    /// Quality assurance.
    QualityAssurance,
    /// Human resources.
    HumanResources,
    /// Unrecognised department.
    Other,
}

impl Department {
    /// Classify a free-text department name.
    #[must_use]
    pub fn classify(department: &str) -> Self {
        let dept = department.to_lowercase();

        if dept.contains("разработ") || dept.contains("dev") {
            Self::Development
        } else if dept.contains("дизайн") || dept.contains("design") {
            Self::Design
        } else if dept.contains("маркетинг") || dept.contains("marketing") {
            Self::Marketing
        } else if dept.contains("продаж") || dept.contains("sales") {
            Self::Sales
        } else if dept.contains("поддержк") || dept.contains("support") {
            Self::Support
        } else if dept.contains("qa") || dept.contains("тестиров") {
            Self::QualityAssurance
        } else if dept == "hr" {
            Self::HumanResources
        } else {
            Self::Other
        }
    }

    /// Human-readable name of the specialized metric for this department.
    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::Development | Self::Other => "Code quality",
            Self::Design => "Creativity",
            Self::Marketing => "Campaign ROI",
            Self::Sales => "Sales conversion",
            Self::Support => "Customer satisfaction",
            Self::QualityAssurance => "Bug detection",
            Self::HumanResources => "Hiring effectiveness",
        }
    }
}

/// The eight weight parameters of the scoring model, as percentages.
///
/// Teamwork and tasks weights apply to every department; the remaining six
/// are the specialized metric weights, one per department category. The
/// weights for a department are expected to sum to 100 but this is not
/// enforced; [`Weights::validate_department`] exists as an operator warning
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    /// Code-quality weight (development, and the fallback for unrecognised
    /// departments).
    pub code_quality: f64,
    /// Teamwork weight, shared by all departments.
    pub teamwork: f64,
    /// Completed-tasks weight, shared by all departments.
    pub tasks: f64,
    /// Creativity weight (design).
    pub design_creativity: f64,
    /// Campaign-ROI weight (marketing).
    pub marketing_roi: f64,
    /// Conversion weight (sales).
    pub sales_conversion: f64,
    /// Customer-satisfaction weight (support).
    pub support_satisfaction: f64,
    /// Bug-detection weight (QA).
    pub qa_bug_detection: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            code_quality: 30.0,
            teamwork: 30.0,
            tasks: 40.0,
            design_creativity: 30.0,
            marketing_roi: 30.0,
            sales_conversion: 30.0,
            support_satisfaction: 30.0,
            qa_bug_detection: 30.0,
        }
    }
}

impl Weights {
    /// The specialized weight that applies to the given department.
    ///
    /// HR gets the arithmetic mean of the six specialized weights.
    #[must_use]
    pub fn department_weight(&self, department: &str) -> f64 {
        match Department::classify(department) {
            Department::Development | Department::Other => self.code_quality,
            Department::Design => self.design_creativity,
            Department::Marketing => self.marketing_roi,
            Department::Sales => self.sales_conversion,
            Department::Support => self.support_satisfaction,
            Department::QualityAssurance => self.qa_bug_detection,
            Department::HumanResources => self.hr_weight(),
        }
    }

    /// Whether the weights for the given department sum to exactly 100%.
    ///
    /// A failed check is a configuration warning, not an error: the
    /// calculation proceeds with whatever weights are configured.
    #[must_use]
    pub fn validate_department(&self, department: &str) -> bool {
        let sum = self.department_weight(department) + self.teamwork + self.tasks;
        (sum - 100.0).abs() < f64::EPSILON
    }

    /// The weighted performance score for an employee of the given
    /// department.
    ///
    /// `department_score`, `teamwork_score` and `tasks_score` are each on a
    /// 0-100 scale; the result is their weighted sum with each weight taken
    /// as a percentage. No normalisation is applied when the weights do not
    /// sum to 100.
    #[must_use]
    pub fn calculate_performance(
        &self,
        department: &str,
        department_score: f64,
        teamwork_score: f64,
        tasks_score: f64,
    ) -> f64 {
        let department_weight = self.department_weight(department);

        department_score * department_weight / 100.0
            + teamwork_score * self.teamwork / 100.0
            + tasks_score * self.tasks / 100.0
    }

    fn hr_weight(&self) -> f64 {
        (self.code_quality
            + self.design_creativity
            + self.marketing_roi
            + self.sales_conversion
            + self.support_satisfaction
            + self.qa_bug_detection)
            / 6.0
    }
}

/// Project-participation statistics for one employee.
///
/// Feeds the derived tasks score and the report's recommendation ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    /// Number of projects the employee is assigned to.
    pub total: usize,
    /// Of those, projects whose status reads as active.
    pub active: usize,
    /// Of those, projects whose status reads as completed.
    pub completed: usize,
    /// Assignments where the employee holds a leadership role.
    pub leadership: usize,
}

impl ProjectStats {
    /// Collect statistics for `username` from its projects and the full
    /// assignment list.
    ///
    /// The role per project is taken from the first matching assignment, the
    /// same record the assignment operations act on.
    #[must_use]
    pub fn collect(projects: &[&Project], assignments: &[&Assignment], username: &str) -> Self {
        let mut stats = Self {
            total: projects.len(),
            ..Self::default()
        };

        for project in projects {
            if is_active_status(project.status()) {
                stats.active += 1;
            } else if is_completed_status(project.status()) {
                stats.completed += 1;
            }

            let role = assignments
                .iter()
                .find(|a| a.username() == username && a.project_name() == project.name())
                .map(|a| a.role());
            if role.is_some_and(is_leadership_role) {
                stats.leadership += 1;
            }
        }

        stats
    }

    /// Derive the tasks score (0-100) from project participation.
    ///
    /// Completion rate plus 10 points per leadership role plus an activity
    /// bonus of up to 20, clamped at 100. Zero projects means zero score.
    #[must_use]
    pub fn tasks_score(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        #[allow(clippy::cast_precision_loss)]
        let (total, completed, active) = (
            self.total as f64,
            self.completed as f64,
            self.active as f64,
        );
        #[allow(clippy::cast_precision_loss)]
        let leadership_bonus = self.leadership as f64 * 10.0;

        let completion_rate = completed / total * 100.0;
        let activity_bonus = active / total * 20.0;

        (completion_rate + leadership_bonus + activity_bonus).min(100.0)
    }
}

fn is_active_status(status: &str) -> bool {
    let status = status.to_lowercase();
    status == "активный" || status == "active"
}

fn is_completed_status(status: &str) -> bool {
    let status = status.to_lowercase();
    status == "завершенный" || status == "completed"
}

fn is_leadership_role(role: &str) -> bool {
    let role = role.to_lowercase();
    matches!(
        role.as_str(),
        "руководитель" | "менеджер" | "ведущий разработчик" | "manager" | "team lead" | "lead"
    )
}

/// Qualification band derived from a performance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    /// Score of 90 or above.
    Expert,
    /// Score of 75 or above.
    Experienced,
    /// Score of 60 or above.
    Competent,
    /// Score of 40 or above.
    Junior,
    /// Anything below 40.
    NeedsDevelopment,
}

impl PerformanceLevel {
    /// Band the given score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Expert
        } else if score >= 75.0 {
            Self::Experienced
        } else if score >= 60.0 {
            Self::Competent
        } else if score >= 40.0 {
            Self::Junior
        } else {
            Self::NeedsDevelopment
        }
    }

    /// Short label for tables and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expert => "EXPERT",
            Self::Experienced => "EXPERIENCED",
            Self::Competent => "COMPETENT",
            Self::Junior => "JUNIOR",
            Self::NeedsDevelopment => "NEEDS DEVELOPMENT",
        }
    }

    /// One-line managerial recommendation for this band.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Expert => "Candidate for promotion or a bonus",
            Self::Experienced => "Consistently strong results",
            Self::Competent => "Meets expectations",
            Self::Junior => "Mentoring recommended",
            Self::NeedsDevelopment => "Needs a development plan",
        }
    }
}

/// Development recommendations derived from project participation.
///
/// A rule ladder over the statistics plus three standing recommendations
/// appended to every list.
#[must_use]
pub fn recommendations(stats: &ProjectStats) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = if stats.total == 0 {
        vec![
            "Include the employee in active projects",
            "Appoint a mentor for onboarding",
            "Define an area of responsibility",
        ]
    } else if stats.leadership == 0 && stats.total >= 3 {
        vec![
            "Consider appointment to a leadership role",
            "Develop management skills",
            "Assign mentoring of new employees",
        ]
    } else if stats.completed == 0 && stats.active > 0 {
        vec![
            "Focus on completing current projects",
            "Improve time-management skills",
            "Set firm deadlines",
        ]
    } else if stats.completed >= 3 && stats.leadership >= 1 {
        vec![
            "Consider the employee for promotion",
            "Assign more complex and responsible tasks",
            "Include in decision-making processes",
        ]
    } else {
        vec![
            "Continue current work",
            "Develop professional skills",
            "Take part in cross-functional projects",
        ]
    };

    out.extend([
        "Hold regular one-to-one meetings",
        "Track project progress",
        "Provide access to training and development",
    ]);

    out
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Разработка", Department::Development; "russian development")]
    #[test_case("Web Development", Department::Development; "english development")]
    #[test_case("Дизайн", Department::Design; "russian design")]
    #[test_case("Маркетинг", Department::Marketing; "russian marketing")]
    #[test_case("Продажи", Department::Sales; "russian sales")]
    #[test_case("Поддержка", Department::Support; "russian support")]
    #[test_case("QA", Department::QualityAssurance; "qa")]
    #[test_case("Отдел тестирования", Department::QualityAssurance; "russian testing")]
    #[test_case("HR", Department::HumanResources; "hr exact")]
    #[test_case("Бухгалтерия", Department::Other; "unknown department")]
    fn departments_classify_by_keyword(name: &str, expected: Department) {
        assert_eq!(Department::classify(name), expected);
    }

    #[test]
    fn hr_must_match_exactly() {
        // "Throughput" contains "hr", but only the exact name is HR.
        assert_eq!(Department::classify("Throughput"), Department::Other);
    }

    #[test]
    fn default_weights_give_the_documented_example() {
        let weights = Weights::default();
        let score = weights.calculate_performance("Разработка", 80.0, 70.0, 90.0);
        assert!((score - 81.0).abs() < 1e-9);
    }

    #[test]
    fn hr_weight_is_the_mean_of_the_specialized_weights() {
        let weights = Weights {
            code_quality: 10.0,
            design_creativity: 20.0,
            marketing_roi: 30.0,
            sales_conversion: 40.0,
            support_satisfaction: 50.0,
            qa_bug_detection: 60.0,
            ..Weights::default()
        };
        assert!((weights.department_weight("HR") - 35.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_departments_fall_back_to_code_quality() {
        let weights = Weights::default();
        assert!((weights.department_weight("Бухгалтерия") - weights.code_quality).abs() < 1e-9);
    }

    #[test]
    fn validation_checks_the_per_department_sum() {
        let weights = Weights::default();
        // 30 + 30 + 40 == 100 for development.
        assert!(weights.validate_department("Разработка"));
        // 30 + 30 + 40 != 100 is false for design (30 + 30 + 40 uses the
        // design weight of 30, so it also sums to 100).
        assert!(weights.validate_department("Дизайн"));

        let skewed = Weights {
            teamwork: 50.0,
            ..Weights::default()
        };
        assert!(!skewed.validate_department("Разработка"));
    }

    #[test]
    fn calculation_is_not_normalised_for_bad_weights() {
        let skewed = Weights {
            code_quality: 100.0,
            teamwork: 100.0,
            tasks: 100.0,
            ..Weights::default()
        };
        let score = skewed.calculate_performance("dev", 50.0, 50.0, 50.0);
        assert!((score - 150.0).abs() < 1e-9);
    }

    fn stats(total: usize, active: usize, completed: usize, leadership: usize) -> ProjectStats {
        ProjectStats {
            total,
            active,
            completed,
            leadership,
        }
    }

    #[test]
    fn tasks_score_combines_completion_leadership_and_activity() {
        // 2 of 4 completed (50), one leadership role (10), 1 of 4 active (5).
        let score = stats(4, 1, 2, 1).tasks_score();
        assert!((score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn tasks_score_clamps_at_one_hundred() {
        let score = stats(2, 0, 2, 3).tasks_score();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tasks_score_is_zero_without_projects() {
        assert!(stats(0, 0, 0, 0).tasks_score().abs() < 1e-9);
    }

    #[test]
    fn stats_collect_counts_statuses_and_leadership() {
        let projects = [
            Project::with_created_date("A", "", "Активный", "2024-01-01 00:00:00"),
            Project::with_created_date("B", "", "завершенный", "2024-01-02 00:00:00"),
            Project::with_created_date("C", "", "планируется", "2024-01-03 00:00:00"),
        ];
        let assignments = [
            Assignment::with_assigned_date("ivanov", "A", "Руководитель", "2024-01-01 00:00:00"),
            Assignment::with_assigned_date("ivanov", "B", "Участник", "2024-01-02 00:00:00"),
            Assignment::with_assigned_date("petrov", "C", "Менеджер", "2024-01-03 00:00:00"),
            Assignment::with_assigned_date("ivanov", "C", "Участник", "2024-01-04 00:00:00"),
        ];

        let project_refs: Vec<&Project> = projects.iter().collect();
        let assignment_refs: Vec<&Assignment> = assignments.iter().collect();
        let stats = ProjectStats::collect(&project_refs, &assignment_refs, "ivanov");

        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.completed, 1);
        // Petrov's leadership on C must not count for Ivanov.
        assert_eq!(stats.leadership, 1);
    }

    #[test_case(95.0, PerformanceLevel::Expert)]
    #[test_case(90.0, PerformanceLevel::Expert)]
    #[test_case(80.0, PerformanceLevel::Experienced)]
    #[test_case(60.0, PerformanceLevel::Competent)]
    #[test_case(45.0, PerformanceLevel::Junior)]
    #[test_case(10.0, PerformanceLevel::NeedsDevelopment)]
    fn scores_band_into_levels(score: f64, expected: PerformanceLevel) {
        assert_eq!(PerformanceLevel::from_score(score), expected);
    }

    #[test]
    fn recommendations_always_include_the_standing_items() {
        let recs = recommendations(&stats(0, 0, 0, 0));
        assert_eq!(recs.len(), 6);
        assert!(recs.contains(&"Hold regular one-to-one meetings"));
    }

    #[test]
    fn seasoned_employees_are_flagged_for_promotion() {
        let recs = recommendations(&stats(5, 1, 3, 2));
        assert_eq!(recs[0], "Consider the employee for promotion");
    }
}
