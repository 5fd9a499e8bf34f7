//! Turns whatever the diagnosis API sent back into an [`InsightResult`].
//!
//! The API has shipped several response layouts and none of them is
//! documented, so this is a best-effort scanner rather than a deserializer.
//! Each extraction rule looks for one layout and appends what it finds. A
//! payload nothing can be read from degrades to [`fallback::generate`].

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fallback;
use crate::models::{
    ActivityLevel, InsightResult, MedicalAdvice, Pattern, Recommendation, Severity, WellnessInput,
};

type Object = Map<String, Value>;
type ExtractionRule = fn(&Object, &mut InsightResult) -> Result<(), ShapeFault>;

/// Top-level keys that mark a payload as something we know how to read.
const RECOGNIZED_KEYS: &[&str] = &["result", "diagnosis", "recommendations", "medicalAdvice"];

const EXTRACTION_RULES: &[(&str, ExtractionRule)] = &[
    ("analysis", extract_analysis),
    ("legacy_result", extract_legacy_result),
    ("diagnosis", extract_diagnosis),
    ("recommendations", extract_top_level_recommendations),
    ("medical_advice", extract_top_level_advice),
];

const GENERAL_CONSULTATION_SITUATION: &str = "General Medical Consultation";
const GENERAL_CONSULTATION_ADVICE: &str = "If symptoms persist or worsen, or if you have any concerns about your health, please consult with a qualified healthcare professional.";

const DEFAULT_TIPS: [&str; 5] = [
    "Maintain a balanced diet with plenty of fruits and vegetables",
    "Stay hydrated throughout the day",
    "Get regular exercise appropriate for your fitness level",
    "Prioritize quality sleep and establish a consistent sleep schedule",
    "Listen to your body and rest when needed",
];

#[derive(Debug, Error)]
enum ShapeFault {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has none of the recognized fields")]
    Unrecognized,
    #[error("`{0}` is present but not an array")]
    NotAnArray(&'static str),
    #[error("`{0}` contains a null entry")]
    NullEntry(&'static str),
}

/// Normalize a raw API payload. Never fails.
pub fn normalize(raw: &Value, input: &WellnessInput) -> InsightResult {
    match try_normalize(raw, input) {
        Ok(result) => result,
        Err(fault) => {
            warn!(%fault, "Unusable diagnosis payload, using fallback insights");
            fallback::generate(input)
        }
    }
}

fn try_normalize(raw: &Value, input: &WellnessInput) -> Result<InsightResult, ShapeFault> {
    let root = raw.as_object().ok_or(ShapeFault::NotAnObject)?;
    if !RECOGNIZED_KEYS.iter().any(|key| field(root, key).is_some()) {
        return Err(ShapeFault::Unrecognized);
    }

    let mut result = InsightResult::default();
    for (name, rule) in EXTRACTION_RULES {
        let before = counts(&result);
        rule(root, &mut result)?;
        debug!(rule = *name, before = ?before, after = ?counts(&result), "Applied extraction rule");
    }

    result.tips.extend(lifestyle_tips(input));
    apply_defaults(&mut result);

    Ok(result)
}

fn counts(result: &InsightResult) -> [usize; 4] {
    [
        result.patterns.len(),
        result.recommendations.len(),
        result.medical_advice.len(),
        result.tips.len(),
    ]
}

/// `result.analysis.*` layout.
fn extract_analysis(root: &Object, out: &mut InsightResult) -> Result<(), ShapeFault> {
    let Some(api_result) = field(root, "result") else {
        return Ok(());
    };
    let Some(analysis) = field(api_result, "analysis").filter(|v| truthy(v)) else {
        return Ok(());
    };

    if let Some(conditions) = array(analysis, "possibleConditions") {
        for condition in conditions {
            let condition = non_null(condition, "result.analysis.possibleConditions")?;
            out.patterns.push(Pattern::new(
                text(condition, &["condition"]).unwrap_or_else(|| "Possible Condition".to_string()),
                text(condition, &["description", "additionalInfo"])
                    .unwrap_or_else(|| "Condition identified".to_string()),
                severity(condition, &["riskLevel"]),
            ));
        }
    }

    if let Some(advice) = field(analysis, "generalAdvice") {
        for action in array(advice, "recommendedActions").into_iter().flatten() {
            if let Some(suggestion) = display_text(action) {
                out.recommendations.push(Recommendation::new("Health Action", suggestion));
            }
        }
        for consideration in array(advice, "lifestyleConsiderations").into_iter().flatten() {
            if let Some(suggestion) = display_text(consideration) {
                out.recommendations.push(Recommendation::new("Lifestyle", suggestion));
            }
        }
        for when in array(advice, "whenToSeekMedicalAttention").into_iter().flatten() {
            if let Some(text) = display_text(when) {
                out.medical_advice
                    .push(MedicalAdvice::new("When to Seek Medical Attention", text));
            }
        }
    }

    let measures = field(api_result, "educationalResources")
        .and_then(|resources| array(resources, "preventiveMeasures"));
    for measure in measures.into_iter().flatten() {
        if let Some(tip) = display_text(measure) {
            out.tips.push(tip);
        }
    }

    Ok(())
}

/// Older `result.possibleConditions` / `result.recommendations` layout.
fn extract_legacy_result(root: &Object, out: &mut InsightResult) -> Result<(), ShapeFault> {
    let Some(api_result) = field(root, "result") else {
        return Ok(());
    };
    if field(api_result, "analysis").is_some_and(truthy) {
        return Ok(());
    }

    if let Some(conditions) = strict_array(api_result, "possibleConditions", "result.possibleConditions")? {
        for condition in conditions {
            let condition = non_null(condition, "result.possibleConditions")?;
            out.patterns.push(Pattern::new(
                text(condition, &["condition", "name"])
                    .unwrap_or_else(|| "Possible Condition".to_string()),
                text(condition, &["description", "info"])
                    .unwrap_or_else(|| "Condition identified".to_string()),
                severity(condition, &["riskLevel", "severity"]),
            ));
        }
    }

    if let Some(recommendations) = strict_array(api_result, "recommendations", "result.recommendations")? {
        for rec in recommendations {
            let suggestion = match non_null(rec, "result.recommendations")? {
                Value::String(s) => Some(s.clone()),
                other => text(other, &["text"]).or_else(|| display_text(other)),
            };
            if let Some(suggestion) = suggestion {
                out.recommendations.push(Recommendation::new("Health", suggestion));
            }
        }
    }

    Ok(())
}

/// Top-level `diagnosis`, either a list or a single assessment.
fn extract_diagnosis(root: &Object, out: &mut InsightResult) -> Result<(), ShapeFault> {
    match field(root, "diagnosis") {
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let entry = non_null(entry, "diagnosis")?;
                out.patterns.push(Pattern::new(
                    text(entry, &["condition"]).unwrap_or_else(|| format!("Diagnosis {}", index + 1)),
                    text(entry, &["description", "explanation"])
                        .unwrap_or_else(|| "Diagnosis information provided".to_string()),
                    severity(entry, &["severity"]),
                ));
            }
        }
        Some(entry @ Value::Object(_)) => {
            out.patterns.push(Pattern::new(
                text(entry, &["condition"]).unwrap_or_else(|| "Medical Assessment".to_string()),
                text(entry, &["description", "explanation"])
                    .unwrap_or_else(|| "Medical diagnosis provided".to_string()),
                severity(entry, &["severity"]),
            ));
        }
        _ => {}
    }
    Ok(())
}

fn extract_top_level_recommendations(root: &Object, out: &mut InsightResult) -> Result<(), ShapeFault> {
    for rec in array_value(field(root, "recommendations")).into_iter().flatten() {
        let rec = non_null(rec, "recommendations")?;
        let category = text(rec, &["category"]).unwrap_or_else(|| "Medical".to_string());
        let suggestion = text(rec, &["text", "advice"]).or_else(|| display_text(rec));
        if let Some(suggestion) = suggestion {
            out.recommendations.push(Recommendation::new(category, suggestion));
        }
    }
    Ok(())
}

fn extract_top_level_advice(root: &Object, out: &mut InsightResult) -> Result<(), ShapeFault> {
    let entries: Vec<&Value> = match field(root, "medicalAdvice") {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(single) => vec![single],
        None => return Ok(()),
    };

    for entry in entries {
        let advice = match non_null(entry, "medicalAdvice")? {
            Value::String(s) => s.clone(),
            other => text(other, &["text", "message"])
                .unwrap_or_else(|| "Consult with a healthcare professional".to_string()),
        };
        out.medical_advice
            .push(MedicalAdvice::new("Medical Consultation Recommended", advice));
    }
    Ok(())
}

/// Tips derived from the user's own answers, independent of the API.
fn lifestyle_tips(input: &WellnessInput) -> Vec<String> {
    let lifestyle = &input.lifestyle;
    let mut tips = Vec::new();

    if lifestyle.sleep_hours < 7.0 {
        tips.push(format!(
            "Aim for 7-9 hours of quality sleep per night. You're currently getting {} hours.",
            lifestyle.sleep_hours
        ));
    }
    if lifestyle.water_intake < 8 {
        tips.push(format!(
            "Increase your daily water intake. You're currently drinking {} glasses - aim for at least 8 glasses per day.",
            lifestyle.water_intake
        ));
    }
    if lifestyle.activity_level == ActivityLevel::Sedentary {
        tips.push(
            "Incorporate light physical activity into your daily routine, such as a 15-minute walk."
                .to_string(),
        );
    }
    if lifestyle.stress_level >= 7 {
        tips.push(
            "Practice stress-reduction techniques like deep breathing or meditation to manage your stress levels."
                .to_string(),
        );
    }

    tips
}

fn apply_defaults(result: &mut InsightResult) {
    if result.patterns.is_empty() {
        result.patterns.push(Pattern::new(
            "Medical Analysis Completed",
            "Your symptoms and health information have been analyzed. Review the recommendations below.",
            Severity::Moderate,
        ));
    }
    if result.medical_advice.is_empty() {
        result.medical_advice.push(general_consultation());
    }
    if result.tips.is_empty() {
        result.tips.extend(DEFAULT_TIPS.iter().map(|t| t.to_string()));
    }
}

pub(crate) fn general_consultation() -> MedicalAdvice {
    MedicalAdvice::new(GENERAL_CONSULTATION_SITUATION, GENERAL_CONSULTATION_ADVICE)
}

// Accessors over the untyped tree. A null value is treated as absent.

fn field<'a>(value: &'a (impl Lookup + ?Sized), key: &str) -> Option<&'a Value> {
    value.lookup(key).filter(|v| !v.is_null())
}

trait Lookup {
    fn lookup(&self, key: &str) -> Option<&Value>;
}

impl Lookup for Object {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Lookup for Value {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

fn array_value(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array)
}

/// An array field, ignoring the field if it has any other type.
fn array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    array_value(field(value, key))
}

/// An array field that must be an array if present at all.
fn strict_array<'a>(
    value: &'a Value,
    key: &str,
    path: &'static str,
) -> Result<Option<&'a Vec<Value>>, ShapeFault> {
    match field(value, key).filter(|v| truthy(v)) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ShapeFault::NotAnArray(path)),
    }
}

/// `false`, zero and the empty string count as absent, like null.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn non_null<'a>(value: &'a Value, path: &'static str) -> Result<&'a Value, ShapeFault> {
    if value.is_null() {
        Err(ShapeFault::NullEntry(path))
    } else {
        Ok(value)
    }
}

/// The first of `keys` holding a non-empty string or a number.
fn text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match field(value, key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn severity(value: &Value, keys: &[&str]) -> Severity {
    text(value, keys)
        .map(|label| Severity::from_label(&label))
        .unwrap_or_default()
}

/// Render a list item for display; objects become compact JSON.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lifestyle;
    use serde_json::json;

    fn healthy_input() -> WellnessInput {
        WellnessInput {
            symptoms: vec!["Cough".to_string()],
            lifestyle: Lifestyle {
                activity_level: ActivityLevel::Active,
                sleep_hours: 8.0,
                water_intake: 9,
                stress_level: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn tired_input() -> WellnessInput {
        WellnessInput {
            symptoms: vec!["Feeling tired".to_string()],
            lifestyle: Lifestyle {
                activity_level: ActivityLevel::Sedentary,
                sleep_hours: 5.0,
                water_intake: 3,
                stress_level: 8,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_new_format_full() {
        let raw = json!({
            "result": {
                "analysis": {
                    "possibleConditions": [
                        {"condition": "Migraine", "description": "Recurrent headache", "riskLevel": "High"},
                        {"additionalInfo": "Viral infection likely"}
                    ],
                    "generalAdvice": {
                        "recommendedActions": ["Rest in a dark room"],
                        "lifestyleConsiderations": ["Limit screen time", "Keep a headache diary"],
                        "whenToSeekMedicalAttention": ["Sudden severe headache"]
                    }
                },
                "educationalResources": {"preventiveMeasures": ["Regular sleep schedule"]}
            }
        });

        let result = normalize(&raw, &healthy_input());

        assert_eq!(result.patterns.len(), 2);
        assert_eq!(result.patterns[0].kind, "Migraine");
        assert_eq!(result.patterns[0].severity, Severity::Warning);
        assert_eq!(result.patterns[1].kind, "Possible Condition");
        assert_eq!(result.patterns[1].description, "Viral infection likely");
        assert_eq!(result.patterns[1].severity, Severity::Moderate);

        let categories: Vec<&str> = result.recommendations.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Health Action", "Lifestyle", "Lifestyle"]);

        assert_eq!(result.medical_advice.len(), 1);
        assert_eq!(result.medical_advice[0].situation, "When to Seek Medical Attention");
        assert_eq!(result.tips, vec!["Regular sleep schedule"]);
    }

    #[test]
    fn test_new_format_single_condition_without_advice() {
        let raw = json!({
            "result": {"analysis": {"possibleConditions": [{"condition": "Tension headache"}]}}
        });

        let result = normalize(&raw, &tired_input());

        assert_eq!(result.patterns.len(), 1);
        assert_eq!(result.patterns[0].description, "Condition identified");
        assert!(result.recommendations.is_empty());
        assert_eq!(result.medical_advice, vec![general_consultation()]);
        assert_eq!(result.tips.len(), 4);
        assert!(result.tips[0].contains("You're currently getting 5 hours"));
        assert!(result.tips[1].contains("drinking 3 glasses"));
    }

    #[test]
    fn test_old_format() {
        let raw = json!({
            "result": {
                "possibleConditions": [{"name": "Common cold", "info": "Upper respiratory", "severity": "low"}],
                "recommendations": ["Drink fluids", {"text": "Rest"}, {"other": 1}]
            }
        });

        let result = normalize(&raw, &healthy_input());

        assert_eq!(result.patterns.len(), 1);
        assert_eq!(result.patterns[0].kind, "Common cold");
        assert_eq!(result.patterns[0].description, "Upper respiratory");
        let suggestions: Vec<&str> = result.recommendations.iter().map(|r| r.suggestion.as_str()).collect();
        assert_eq!(suggestions, vec!["Drink fluids", "Rest", r#"{"other":1}"#]);
        assert!(result.recommendations.iter().all(|r| r.category == "Health"));
    }

    #[test]
    fn test_top_level_fields_accumulate_with_result() {
        let raw = json!({
            "result": {"possibleConditions": [{"condition": "Flu"}]},
            "diagnosis": [{"description": "Seasonal"}, {"condition": "Fatigue", "severity": "alert"}],
            "recommendations": [{"category": "Treatment", "advice": "Paracetamol"}, "Sleep more"],
            "medicalAdvice": "See a GP within a week"
        });

        let result = normalize(&raw, &healthy_input());

        let kinds: Vec<&str> = result.patterns.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Flu", "Diagnosis 1", "Fatigue"]);
        assert_eq!(result.patterns[2].severity, Severity::Alert);

        assert_eq!(result.recommendations[0], Recommendation::new("Treatment", "Paracetamol"));
        assert_eq!(result.recommendations[1], Recommendation::new("Medical", "Sleep more"));

        assert_eq!(
            result.medical_advice,
            vec![MedicalAdvice::new("Medical Consultation Recommended", "See a GP within a week")]
        );
    }

    #[test]
    fn test_single_diagnosis_object_and_advice_list() {
        let raw = json!({
            "diagnosis": {"explanation": "Likely stress related"},
            "medicalAdvice": [{"message": "Monitor symptoms"}, {}]
        });

        let result = normalize(&raw, &healthy_input());

        assert_eq!(result.patterns[0].kind, "Medical Assessment");
        assert_eq!(result.patterns[0].description, "Likely stress related");
        assert_eq!(result.medical_advice[0].advice, "Monitor symptoms");
        assert_eq!(result.medical_advice[1].advice, "Consult with a healthcare professional");
    }

    #[test]
    fn test_recognized_but_empty_gets_defaults() {
        let result = normalize(&json!({"result": {}}), &healthy_input());

        assert_eq!(result.patterns.len(), 1);
        assert_eq!(result.patterns[0].kind, "Medical Analysis Completed");
        assert_eq!(result.medical_advice[0].situation, GENERAL_CONSULTATION_SITUATION);
        assert_eq!(result.tips.len(), DEFAULT_TIPS.len());
    }

    #[test]
    fn test_unrecognized_payloads_degrade_to_fallback() {
        let input = tired_input();
        let expected = fallback::generate(&input);

        for raw in [
            json!({}),
            json!(null),
            json!([]),
            json!("ok"),
            json!({"status": "ok", "data": {}}),
            json!({"result": null}),
        ] {
            assert_eq!(normalize(&raw, &input), expected, "payload: {}", raw);
        }
    }

    #[test]
    fn test_shape_faults_degrade_to_fallback() {
        let input = tired_input();
        let expected = fallback::generate(&input);

        for raw in [
            json!({"result": {"possibleConditions": "Flu"}}),
            json!({"result": {"recommendations": {"text": "Rest"}}}),
            json!({"diagnosis": [null]}),
            json!({"result": {"analysis": {"possibleConditions": [null]}}}),
            json!({"medicalAdvice": [null]}),
            json!({"result": {"recommendations": [null]}}),
            json!({"result": {"possibleConditions": "Flu"}, "diagnosis": []}),
        ] {
            assert_eq!(normalize(&raw, &input), expected, "payload: {}", raw);
        }
    }

    #[test]
    fn test_falsy_analysis_reads_old_format() {
        for analysis in [json!(false), json!(0), json!("")] {
            let raw = json!({
                "result": {"analysis": analysis, "possibleConditions": [{"condition": "Flu"}]}
            });
            let result = normalize(&raw, &healthy_input());
            assert_eq!(result.patterns.len(), 1, "analysis: {}", analysis);
            assert_eq!(result.patterns[0].kind, "Flu");
        }
    }

    #[test]
    fn test_falsy_old_format_lists_are_skipped() {
        let raw = json!({"result": {"possibleConditions": false, "recommendations": ""}});
        let result = normalize(&raw, &healthy_input());
        assert_eq!(result.patterns[0].kind, "Medical Analysis Completed");
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_lifestyle_tip_thresholds() {
        let raw = json!({"result": {}});
        let mut input = healthy_input();
        input.lifestyle.sleep_hours = 7.0;
        input.lifestyle.water_intake = 8;
        input.lifestyle.stress_level = 6;
        assert_eq!(normalize(&raw, &input).tips.len(), DEFAULT_TIPS.len());

        input.lifestyle.stress_level = 7;
        let tips = normalize(&raw, &input).tips;
        assert_eq!(tips.len(), 1);
        assert!(tips[0].starts_with("Practice stress-reduction"));

        input.lifestyle.stress_level = 6;
        input.lifestyle.water_intake = 7;
        input.lifestyle.sleep_hours = 6.9;
        let tips = normalize(&raw, &input).tips;
        assert_eq!(tips.len(), 2);
        assert!(tips[0].contains("getting 6.9 hours"));
        assert!(tips[1].contains("drinking 7 glasses"));
    }

    #[test]
    fn test_new_format_ignores_non_array_lists() {
        let raw = json!({
            "result": {"analysis": {"possibleConditions": "Flu", "generalAdvice": {"recommendedActions": "Rest"}}}
        });

        let result = normalize(&raw, &healthy_input());

        assert_eq!(result.patterns[0].kind, "Medical Analysis Completed");
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = json!({
            "result": {"analysis": {"possibleConditions": [{"condition": "Migraine"}]}},
            "medicalAdvice": ["Hydrate"]
        });
        let input = tired_input();

        assert_eq!(normalize(&raw, &input), normalize(&raw, &input));
    }

    #[test]
    fn test_output_sections_never_empty() {
        let input = healthy_input();
        for raw in [json!({"result": {}}), json!({"diagnosis": "text"}), json!(42)] {
            let result = normalize(&raw, &input);
            assert!(!result.medical_advice.is_empty());
            assert!(!result.tips.is_empty());
        }
    }
}
