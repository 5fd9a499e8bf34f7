//! Shared data models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Everything the questionnaire collects for one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WellnessInput {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub health_profile: HealthProfile,
    #[serde(default)]
    #[validate(nested)]
    pub lifestyle: Lifestyle,
}

impl WellnessInput {
    /// True if any symptom contains one of `terms`, ignoring case.
    pub fn has_symptom_matching(&self, terms: &[&str]) -> bool {
        self.symptoms.iter().any(|symptom| {
            let symptom = symptom.to_lowercase();
            terms.iter().any(|term| symptom.contains(term))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    #[validate(range(max = 150))]
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Centimetres
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    /// Kilograms
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl HealthProfile {
    /// Age, treating zero as missing.
    pub fn known_age(&self) -> Option<u32> {
        self.age.filter(|a| *a > 0)
    }

    /// Height in centimetres, treating zero as missing.
    pub fn known_height(&self) -> Option<f64> {
        self.height.filter(|h| *h > 0.0)
    }

    /// Weight in kilograms, treating zero as missing.
    pub fn known_weight(&self) -> Option<f64> {
        self.weight.filter(|w| *w > 0.0)
    }

    /// Body-mass index, when both height and weight are known.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.known_height()? / 100.0;
        let weight = self.known_weight()?;
        Some(weight / (height_m * height_m))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default = "default_sleep_hours")]
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: f64,
    #[serde(default)]
    pub sleep_quality: SleepQuality,
    #[serde(default)]
    pub diet_type: DietType,
    /// Glasses per day
    #[serde(default = "default_water_intake")]
    #[validate(range(max = 100))]
    pub water_intake: u32,
    #[serde(default = "default_stress_level")]
    #[validate(range(max = 10))]
    pub stress_level: u8,
}

fn default_sleep_hours() -> f64 {
    8.0
}

fn default_water_intake() -> u32 {
    8
}

fn default_stress_level() -> u8 {
    5
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self {
            activity_level: ActivityLevel::default(),
            sleep_hours: default_sleep_hours(),
            sleep_quality: SleepQuality::default(),
            diet_type: DietType::default(),
            water_intake: default_water_intake(),
            stress_level: default_stress_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    Mediterranean,
    Other,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// How concerning a detected pattern is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Moderate,
    Warning,
    Alert,
}

impl Severity {
    /// Interpret a free-form risk label from the diagnosis API.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "alert" | "critical" | "severe" | "urgent" | "emergency" | "very high" => {
                Severity::Alert
            }
            "warning" | "high" | "elevated" => Severity::Warning,
            _ => Severity::Moderate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: Severity,
}

impl Pattern {
    pub fn new(kind: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
}

impl Recommendation {
    pub fn new(category: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalAdvice {
    pub situation: String,
    pub advice: String,
}

impl MedicalAdvice {
    pub fn new(situation: impl Into<String>, advice: impl Into<String>) -> Self {
        Self {
            situation: situation.into(),
            advice: advice.into(),
        }
    }
}

/// Canonical insight set handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub patterns: Vec<Pattern>,
    pub recommendations: Vec<Recommendation>,
    pub medical_advice: Vec<MedicalAdvice>,
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_questionnaire_payload() {
        let json = r#"{
            "symptoms": ["Headache", "Fever"],
            "healthProfile": {"age": 29, "gender": "Male", "height": 180, "weight": 75,
                              "medicalHistory": ["Asthma"]},
            "lifestyle": {"activityLevel": "very-active", "sleepHours": 6.5,
                          "sleepQuality": "fair", "dietType": "keto",
                          "waterIntake": 4, "stressLevel": 7}
        }"#;

        let input: WellnessInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.symptoms, vec!["Headache", "Fever"]);
        assert_eq!(input.health_profile.age, Some(29));
        assert_eq!(input.health_profile.medical_history, vec!["Asthma"]);
        assert!(input.health_profile.medications.is_empty());
        assert_eq!(input.lifestyle.activity_level, ActivityLevel::VeryActive);
        assert_eq!(input.lifestyle.diet_type, DietType::Keto);
        assert_eq!(input.lifestyle.sleep_hours, 6.5);
        assert_eq!(input.lifestyle.stress_level, 7);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let input: WellnessInput = serde_json::from_str(r#"{"symptoms": []}"#).unwrap();
        assert_eq!(input.lifestyle, Lifestyle::default());
        assert_eq!(input.lifestyle.stress_level, 5);
        assert_eq!(input.health_profile, HealthProfile::default());
    }

    #[test]
    fn test_unknown_enum_values_are_unspecified() {
        let lifestyle: Lifestyle =
            serde_json::from_str(r#"{"activityLevel": "couch", "dietType": "carnivore"}"#).unwrap();
        assert_eq!(lifestyle.activity_level, ActivityLevel::Unspecified);
        assert_eq!(lifestyle.diet_type, DietType::Unspecified);
    }

    #[test]
    fn test_stress_out_of_range_fails_validation() {
        let mut input = WellnessInput::default();
        input.lifestyle.stress_level = 11;
        assert!(input.validate().is_err());

        input.lifestyle.stress_level = 10;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_bmi_requires_height_and_weight() {
        let mut profile = HealthProfile {
            height: Some(180.0),
            weight: Some(81.0),
            ..Default::default()
        };
        let bmi = profile.bmi().unwrap();
        assert!((bmi - 25.0).abs() < 1e-9);

        profile.weight = Some(0.0);
        assert_eq!(profile.bmi(), None);
        profile.weight = None;
        assert_eq!(profile.bmi(), None);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("High"), Severity::Warning);
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Alert);
        assert_eq!(Severity::from_label("low"), Severity::Moderate);
        assert_eq!(Severity::from_label(""), Severity::Moderate);
    }

    #[test]
    fn test_insight_result_wire_format() {
        let result = InsightResult {
            patterns: vec![Pattern::new("High Stress", "Stress is 8/10", Severity::Warning)],
            recommendations: vec![],
            medical_advice: vec![MedicalAdvice::new("General", "See a doctor")],
            tips: vec!["Rest".to_string()],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["patterns"][0]["type"], "High Stress");
        assert_eq!(value["patterns"][0]["severity"], "warning");
        assert_eq!(value["medicalAdvice"][0]["situation"], "General");
    }
}
