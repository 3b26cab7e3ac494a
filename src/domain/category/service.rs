use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{LazyLock, PoisonError, RwLock};

pub const DEFAULT_CATEGORY: &str = "General Health";

/// Predefined taxonomy in declaration order; earlier entries win ties
pub static PREDEFINED_CATEGORIES: LazyLock<Vec<(&'static str, &'static [&'static str])>> =
    LazyLock::new(|| {
        vec![
            (
                "Mental Health",
                &["anxiety", "depression", "stress", "mental", "therapy", "psychology", "mood", "suicide"][..],
            ),
            (
                "Nutrition",
                &["diet", "food", "nutrition", "vitamin", "mineral", "eating", "recipe", "weight"][..],
            ),
            (
                "Heart Disease",
                &["heart", "cardiac", "cardiovascular", "blood pressure", "cholesterol", "stroke"][..],
            ),
            (
                "Diabetes",
                &["diabetes", "blood sugar", "insulin", "glucose", "diabetic"][..],
            ),
            (
                "Fitness",
                &["exercise", "workout", "fitness", "gym", "physical activity", "sports"][..],
            ),
            (
                "Cancer",
                &["cancer", "tumor", "oncology", "chemotherapy", "radiation", "malignant"][..],
            ),
            (
                "Women's Health",
                &["pregnancy", "menstruation", "menopause", "breast", "ovarian", "maternal"][..],
            ),
            (
                "Public Health",
                &["epidemic", "pandemic", "vaccination", "immunization", "outbreak", "disease prevention"][..],
            ),
            (
                "Infectious Diseases",
                &["virus", "bacteria", "infection", "flu", "covid", "malaria", "tuberculosis"][..],
            ),
        ]
    });

static HEALTH_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:disease|health|medical|clinical|treatment|symptom|diagnosis|therapy|cure|prevention)\w*\b",
    )
    .expect("health term pattern is valid")
});

/// Keyword categorizer. Owns the dynamic, append-only part of the taxonomy.
#[derive(Default)]
pub struct Categorizer {
    dynamic: RwLock<BTreeSet<String>>,
}

impl Categorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with labels discovered by earlier processes
    pub fn with_dynamic<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            dynamic: RwLock::new(labels.into_iter().collect()),
        }
    }

    /// Pick the best matching predefined category and, as a side effect,
    /// grow the dynamic set from generic health terms in the text.
    pub fn categorize(&self, title: &str, summary: &str) -> String {
        let text = format!("{} {}", title, summary).to_lowercase();

        self.discover_terms(&text);

        let mut best: Option<(&str, usize)> = None;
        for (label, keywords) in PREDEFINED_CATEGORIES.iter() {
            let strength = keywords.iter().filter(|k| text.contains(*k)).count();
            if strength == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= strength => {}
                _ => best = Some((label, strength)),
            }
        }

        best.map(|(label, _)| label.to_string())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    pub fn dynamic_labels(&self) -> Vec<String> {
        self.dynamic
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Predefined, dynamic and default labels, sorted and deduplicated
    pub fn all_labels(&self) -> Vec<String> {
        let mut labels: BTreeSet<String> = PREDEFINED_CATEGORIES
            .iter()
            .map(|(label, _)| label.to_string())
            .collect();
        labels.extend(self.dynamic_labels());
        labels.insert(DEFAULT_CATEGORY.to_string());
        labels.into_iter().collect()
    }

    fn discover_terms(&self, text: &str) {
        let terms: Vec<String> = HEALTH_TERMS
            .find_iter(text)
            .map(|m| title_case(m.as_str()))
            .collect();
        if terms.is_empty() {
            return;
        }

        let mut dynamic = self.dynamic.write().unwrap_or_else(PoisonError::into_inner);
        dynamic.extend(terms);
    }
}

fn title_case(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
