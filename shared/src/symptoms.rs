//! Built-in list of common symptoms offered on the first step.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymptomCategory {
    CommonSickness,
    Stomach,
    Breathing,
    Tiredness,
    Skin,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomEntry {
    pub name: &'static str,
    pub category: SymptomCategory,
}

const fn entry(name: &'static str, category: SymptomCategory) -> SymptomEntry {
    SymptomEntry { name, category }
}

use SymptomCategory::*;

static CATALOG: [SymptomEntry; 25] = [
    entry("Fever", CommonSickness),
    entry("Headache", CommonSickness),
    entry("Body pain", CommonSickness),
    entry("Joint pain", CommonSickness),
    entry("Back pain", CommonSickness),
    entry("Stomach pain", Stomach),
    entry("Diarrhea", Stomach),
    entry("Nausea", Stomach),
    entry("Vomiting", Stomach),
    entry("Loss of appetite", Stomach),
    entry("Cough", Breathing),
    entry("Running nose", Breathing),
    entry("Sore throat", Breathing),
    entry("Chest pain", Breathing),
    entry("Feeling tired", Tiredness),
    entry("Weakness", Tiredness),
    entry("Dizziness", Tiredness),
    entry("Skin rash", Skin),
    entry("Itching", Skin),
    entry("Chills", Skin),
    entry("Sweating", Skin),
    entry("Difficulty sleeping", Other),
    entry("Stress", Other),
    entry("Muscle pain", Other),
    entry("Cold", Other),
];

/// All symptoms in display order.
pub fn catalog() -> &'static [SymptomEntry] {
    &CATALOG
}

/// Case-insensitive substring search; a blank term matches everything.
pub fn search(term: &str) -> Vec<SymptomEntry> {
    let term = term.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|s| term.is_empty() || s.name.to_lowercase().contains(&term))
        .copied()
        .collect()
}
