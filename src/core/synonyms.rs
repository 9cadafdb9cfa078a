use crate::rubric::SynonymTable;

/// Subject groups shared by the generic, UK and Singapore rubrics
pub static BASIC_SYNONYMS: &SynonymTable = &[
    ("cs", &["cs", "computer science", "it", "software", "computing"]),
    ("ai", &["ai", "artificial intelligence", "machine learning", "ml"]),
    ("engineering", &["engineering", "eng", "tech"]),
    ("business", &["business", "commerce", "management", "mba"]),
    ("economics", &["economics", "econ", "finance"]),
    ("design", &["design", "art", "creative"]),
];

/// Broader subject groups used by the Australian rubric
pub static EXTENDED_SYNONYMS: &SynonymTable = &[
    (
        "cs",
        &["cs", "computer science", "it", "software", "computing", "information technology"],
    ),
    (
        "ai",
        &["ai", "artificial intelligence", "machine learning", "ml", "data science"],
    ),
    (
        "engineering",
        &["engineering", "eng", "tech", "mechanical", "civil", "electrical", "chemical"],
    ),
    (
        "business",
        &["business", "commerce", "management", "mba", "marketing", "accounting"],
    ),
    ("economics", &["economics", "econ", "finance", "financial"]),
    ("design", &["design", "art", "creative", "graphic design", "fashion"]),
    ("medicine", &["medicine", "medical", "health", "biomedical"]),
    ("law", &["law", "legal", "jurisprudence"]),
    ("education", &["education", "teaching", "pedagogy"]),
    ("architecture", &["architecture", "architectural", "urban planning"]),
    ("nursing", &["nursing", "nurse", "healthcare"]),
    ("psychology", &["psychology", "psych", "counseling"]),
    ("pharmacy", &["pharmacy", "pharmaceutical"]),
    ("veterinary", &["veterinary", "vet", "animal science"]),
    ("agriculture", &["agriculture", "agricultural", "agronomy"]),
    ("arts", &["arts", "fine arts", "visual arts"]),
    ("humanities", &["humanities", "history", "philosophy", "literature"]),
    (
        "natural sciences",
        &["natural sciences", "biology", "chemistry", "physics", "mathematics"],
    ),
    ("public health", &["public health", "epidemiology", "health policy"]),
    (
        "communication",
        &["communication", "media", "journalism", "public relations"],
    ),
    ("film", &["film", "cinema", "film studies", "media production"]),
    (
        "marine science",
        &["marine science", "oceanography", "marine biology"],
    ),
    ("social work", &["social work", "social services"]),
    ("tourism", &["tourism", "hospitality", "tourism management"]),
    (
        "sports science",
        &["sports science", "exercise science", "kinesiology", "sports"],
    ),
];

/// Map a subject label to its canonical group, or its lowercase form
///
/// Synonyms match on word boundaries, so "it" does not hit "digital".
pub fn canonicalize(label: &str, table: &SynonymTable) -> String {
    let lower = label.trim().to_lowercase();
    table
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|syn| contains_phrase(&lower, syn)))
        .map(|(canonical, _)| canonical.to_string())
        .unwrap_or(lower)
}

/// Whether `phrase` occurs in `text` delimited by non-alphanumeric characters
#[inline]
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Whether two canonical labels overlap (substring either way)
#[inline]
fn labels_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Selected interests found among a candidate's strengths, in selection order
pub fn matched_interests(
    interests: &[String],
    strengths: &[String],
    table: &SynonymTable,
) -> Vec<String> {
    let canonical_strengths: Vec<String> =
        strengths.iter().map(|s| canonicalize(s, table)).collect();

    interests
        .iter()
        .filter(|interest| !interest.trim().is_empty())
        .filter(|interest| {
            let canonical = canonicalize(interest, table);
            canonical_strengths
                .iter()
                .any(|strength| labels_overlap(&canonical, strength))
        })
        .cloned()
        .collect()
}

/// Non-blank selected interests
pub fn selected_count(interests: &[String]) -> usize {
    interests.iter().filter(|i| !i.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonicalize_synonyms() {
        assert_eq!(canonicalize("Computer Science", BASIC_SYNONYMS), "cs");
        assert_eq!(canonicalize("Machine Learning", BASIC_SYNONYMS), "ai");
        assert_eq!(canonicalize("Oceanography", EXTENDED_SYNONYMS), "marine science");
        assert_eq!(canonicalize("Astronomy", BASIC_SYNONYMS), "astronomy");
    }

    #[test]
    fn test_synonyms_require_word_boundaries() {
        // "it" inside "digital" and "econ" prefix must not canonicalize to cs
        assert_eq!(canonicalize("Digital Humanities", BASIC_SYNONYMS), "digital humanities");
        assert_eq!(canonicalize("Economics", BASIC_SYNONYMS), "economics");
    }

    #[test]
    fn test_matched_interests_uses_synonyms() {
        let matched = matched_interests(
            &strings(&["cs", "economics", "law"]),
            &strings(&["Computer Science", "Finance"]),
            BASIC_SYNONYMS,
        );
        assert_eq!(matched, strings(&["cs", "economics"]));
    }

    #[test]
    fn test_blank_interests_ignored() {
        let interests = strings(&["", "  ", "design"]);
        assert_eq!(selected_count(&interests), 1);
        assert!(matched_interests(&interests, &strings(&["Art"]), BASIC_SYNONYMS)
            .contains(&"design".to_string()));
    }
}
