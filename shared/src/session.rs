//! Questionnaire session state.
//!
//! Holds everything the multi-step form collects, validates each step
//! before moving on, and keeps the latest insight outcome until reset. The
//! insight engine itself stays stateless; this is the only place that
//! remembers anything between calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::diagnosis::DiagnosisApi;
use crate::insights::{InsightOutcome, InsightService};
use crate::models::{HealthProfile, Lifestyle, WellnessInput};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Symptoms = 1,
    HealthProfile = 2,
    Lifestyle = 3,
    Insights = 4,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    fn next(self) -> Self {
        match self {
            Step::Symptoms => Step::HealthProfile,
            Step::HealthProfile => Step::Lifestyle,
            Step::Lifestyle | Step::Insights => Step::Insights,
        }
    }

    fn prev(self) -> Self {
        match self {
            Step::Symptoms | Step::HealthProfile => Step::Symptoms,
            Step::Lifestyle => Step::HealthProfile,
            Step::Insights => Step::Lifestyle,
        }
    }
}

/// Free-text lists on the health profile step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    MedicalHistory,
    Medications,
    Allergies,
}

/// Shared "request in flight" flag the UI can watch.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator(Arc<AtomicBool>);

impl LoadingIndicator {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag, or return `None` if it is already raised.
    pub fn try_begin(&self) -> Option<LoadingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LoadingGuard(Arc::clone(&self.0)))
    }
}

/// Lowers the loading flag when dropped.
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct WellnessSession {
    id: Uuid,
    step: Step,
    symptoms: Vec<String>,
    health_profile: HealthProfile,
    lifestyle: Lifestyle,
    outcome: Option<InsightOutcome>,
    loading: LoadingIndicator,
}

impl Default for WellnessSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::Symptoms,
            symptoms: Vec::new(),
            health_profile: HealthProfile::default(),
            lifestyle: Lifestyle::default(),
            outcome: None,
            loading: LoadingIndicator::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn selected_symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn health_profile(&self) -> &HealthProfile {
        &self.health_profile
    }

    pub fn insights(&self) -> Option<&InsightOutcome> {
        self.outcome.as_ref()
    }

    pub fn loading_indicator(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Select the symptom, or deselect it if already selected.
    pub fn toggle_symptom(&mut self, symptom: &str) {
        match self.symptoms.iter().position(|s| s == symptom) {
            Some(index) => {
                self.symptoms.remove(index);
            }
            None => self.symptoms.push(symptom.to_string()),
        }
    }

    pub fn remove_symptom(&mut self, symptom: &str) {
        self.symptoms.retain(|s| s != symptom);
    }

    /// Add a trimmed, non-duplicate tag. Returns whether it was added.
    pub fn add_tag(&mut self, field: TagField, value: &str) -> bool {
        let value = value.trim();
        let tags = self.tags_mut(field);
        if value.is_empty() || tags.iter().any(|t| t == value) {
            return false;
        }
        tags.push(value.to_string());
        true
    }

    pub fn remove_tag(&mut self, field: TagField, value: &str) {
        self.tags_mut(field).retain(|t| t != value);
    }

    fn tags_mut(&mut self, field: TagField) -> &mut Vec<String> {
        match field {
            TagField::MedicalHistory => &mut self.health_profile.medical_history,
            TagField::Medications => &mut self.health_profile.medications,
            TagField::Allergies => &mut self.health_profile.allergies,
        }
    }

    /// Record the health profile form. Tag lists are left untouched.
    pub fn set_profile_details(
        &mut self,
        age: Option<u32>,
        gender: Option<String>,
        height: Option<f64>,
        weight: Option<f64>,
    ) {
        self.health_profile.age = age;
        self.health_profile.gender = gender;
        self.health_profile.height = height;
        self.health_profile.weight = weight;
    }

    pub fn set_lifestyle(&mut self, lifestyle: Lifestyle) {
        self.lifestyle = lifestyle;
    }

    pub fn validate_current_step(&self) -> Result<()> {
        match self.step {
            Step::Symptoms => {
                if self.symptoms.is_empty() {
                    return Err(Error::Validation(
                        "Please select at least one symptom to continue.".to_string(),
                    ));
                }
            }
            Step::HealthProfile => {
                let profile = &self.health_profile;
                if profile.known_age().is_none()
                    || profile.known_height().is_none()
                    || profile.known_weight().is_none()
                {
                    return Err(Error::Validation(
                        "Age, height and weight are required.".to_string(),
                    ));
                }
                profile.validate()?;
            }
            Step::Lifestyle => self.lifestyle.validate()?,
            Step::Insights => {}
        }
        Ok(())
    }

    /// Validate the current step and advance.
    pub fn next_step(&mut self) -> Result<Step> {
        self.validate_current_step()?;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn prev_step(&mut self) -> Step {
        self.step = self.step.prev();
        self.step
    }

    pub fn wellness_input(&self) -> WellnessInput {
        WellnessInput {
            symptoms: self.symptoms.clone(),
            health_profile: self.health_profile.clone(),
            lifestyle: self.lifestyle.clone(),
        }
    }

    /// Submit the questionnaire and keep the outcome.
    ///
    /// Only one submission may be in flight; the loading indicator is raised
    /// for the duration of the call and lowered on every exit path.
    pub async fn generate_insights<C: DiagnosisApi>(
        &mut self,
        service: &InsightService<C>,
    ) -> Result<&InsightOutcome> {
        self.validate_current_step()?;
        let _loading = self.loading.try_begin().ok_or_else(|| {
            Error::Conflict("An insight request is already in progress".to_string())
        })?;

        self.step = Step::Insights;
        let input = self.wellness_input();
        let outcome = service.generate(&input).await;

        info!(session_id = %self.id, source = ?outcome.source, "Insights ready");
        Ok(&*self.outcome.insert(outcome))
    }

    /// Clear all answers and results and return to the first step.
    pub fn reset(&mut self) {
        self.step = Step::Symptoms;
        self.symptoms.clear();
        self.health_profile = HealthProfile::default();
        self.lifestyle = Lifestyle::default();
        self.outcome = None;
    }
}
