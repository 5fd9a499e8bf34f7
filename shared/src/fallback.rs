//! Rule-based insights computed locally from the questionnaire answers.
//!
//! Used whenever the diagnosis API is unreachable or its answer cannot be
//! read. Every rule is evaluated independently and all matching rules fire;
//! output order follows rule order.

use crate::models::{
    ActivityLevel, InsightResult, MedicalAdvice, Pattern, Recommendation, Severity, WellnessInput,
};
use crate::normalizer::general_consultation;

const FATIGUE_TERMS: &[&str] = &["fatigue", "low energy", "tiredness", "exhaustion", "weakness", "lethargy"];
const PAIN_TERMS: &[&str] = &["headache", "pain", "ache"];

const UNDERWEIGHT_BMI: f64 = 18.5;
const OVERWEIGHT_BMI: f64 = 25.0;

const GENERAL_TIPS: [&str; 6] = [
    "Maintain a balanced diet with plenty of fruits and vegetables",
    "Stay hydrated throughout the day",
    "Get regular exercise, even if it's just a short walk",
    "Prioritize quality sleep and establish a consistent sleep schedule",
    "Take breaks and practice stress management techniques",
    "Listen to your body and rest when needed",
];

/// Generate insights from the input alone. Pure and deterministic.
pub fn generate(input: &WellnessInput) -> InsightResult {
    let lifestyle = &input.lifestyle;
    let high_stress = lifestyle.stress_level >= 7;
    let mut result = InsightResult::default();

    if input.has_symptom_matching(FATIGUE_TERMS) {
        result.patterns.push(Pattern::new(
            "Fatigue Pattern",
            "You're experiencing fatigue-related symptoms. This may be related to sleep quality, stress levels, or lifestyle factors.",
            Severity::Moderate,
        ));
    }

    if lifestyle.sleep_hours < 7.0 {
        result.patterns.push(Pattern::new(
            "Sleep Deprivation",
            format!(
                "You're getting {} hours of sleep, which may be below recommended levels (7-9 hours for adults).",
                lifestyle.sleep_hours
            ),
            Severity::Warning,
        ));
        result.recommendations.push(Recommendation::new(
            "Sleep",
            "Aim for 7-9 hours of quality sleep per night. Establish a consistent sleep schedule and create a relaxing bedtime routine.",
        ));
    }

    if lifestyle.water_intake < 6 {
        result.patterns.push(Pattern::new(
            "Dehydration Risk",
            format!(
                "You're drinking {} glasses of water per day, which may be insufficient.",
                lifestyle.water_intake
            ),
            Severity::Moderate,
        ));
        result.recommendations.push(Recommendation::new(
            "Hydration",
            "Increase your daily water intake to at least 8 glasses (2 liters). Carry a water bottle with you as a reminder.",
        ));
    }

    if high_stress {
        result.patterns.push(Pattern::new(
            "High Stress",
            format!(
                "Your stress level is {}/10, which is quite high. High stress can impact overall wellness.",
                lifestyle.stress_level
            ),
            Severity::Warning,
        ));
        result.recommendations.push(Recommendation::new(
            "Stress Management",
            "Practice stress-reduction techniques such as deep breathing, meditation, or gentle exercise. Consider talking to a counselor or therapist.",
        ));
    }

    if lifestyle.activity_level == ActivityLevel::Sedentary {
        result.patterns.push(Pattern::new(
            "Low Activity",
            "Your activity level is sedentary. Regular physical activity is important for overall wellness.",
            Severity::Moderate,
        ));
        result.recommendations.push(Recommendation::new(
            "Exercise",
            "Start with light activities like walking 10-15 minutes daily, gradually increasing duration and intensity.",
        ));
    }

    if input.symptoms.len() >= 5 {
        result.medical_advice.push(MedicalAdvice::new(
            "Multiple symptoms present",
            "If you're experiencing multiple symptoms simultaneously, consider consulting a healthcare professional for a comprehensive evaluation.",
        ));
    }

    if high_stress && input.has_symptom_matching(PAIN_TERMS) {
        result.medical_advice.push(MedicalAdvice::new(
            "Persistent pain with high stress",
            "Chronic pain combined with high stress levels may benefit from professional medical evaluation and stress management support.",
        ));
    }

    result.tips.extend(GENERAL_TIPS.iter().map(|t| t.to_string()));

    if let Some(recommendation) = input.health_profile.bmi().and_then(nutrition_guidance) {
        result.recommendations.push(recommendation);
    }

    if result.medical_advice.is_empty() {
        result.medical_advice.push(general_consultation());
    }

    result
}

/// Nutrition advice for a BMI outside the 18.5-25 band, if any.
fn nutrition_guidance(bmi: f64) -> Option<Recommendation> {
    if bmi < UNDERWEIGHT_BMI {
        Some(Recommendation::new(
            "Nutrition",
            "Your BMI suggests you may be underweight. Consider consulting a nutritionist for personalized dietary guidance.",
        ))
    } else if bmi > OVERWEIGHT_BMI {
        Some(Recommendation::new(
            "Nutrition",
            "Your BMI suggests you may benefit from weight management. Focus on balanced nutrition and regular physical activity.",
        ))
    } else {
        None
    }
}
