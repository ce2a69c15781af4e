//! Section placement for AI-extracted resumes.
//!
//! The extraction prompt tells the model to keep academic entries out of `experience`,
//! but model output is untrusted. This pass re-checks placement after parsing.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeContent};

/// Credential phrases that never describe a paid position. Matched as whole words, so
/// "b tech" also covers "B.Tech". A bare "intermediate" or "degree" is not enough:
/// "Intermediate Software Developer" is a job title.
const CREDENTIAL_PHRASES: &[&str] = &[
    "bachelor",
    "bachelors",
    "btech",
    "b tech",
    "mtech",
    "m tech",
    "bsc",
    "msc",
    "phd",
    "master of",
    "masters in",
    "degree in",
    "diploma",
    "high school",
    "higher secondary",
    "class x",
    "class xii",
    "intermediate science",
    "intermediate commerce",
    "intermediate arts",
    "cgpa",
    "percentage",
];

/// Words that mark an organisation as a school.
const INSTITUTION_KEYWORDS: &[&str] = &["college", "institute", "university", "school"];

/// Grade markers that only show up in academic descriptions.
const GRADE_MARKERS: &[&str] = &["cgpa", "gpa"];

/// Lowercased alphanumeric words; punctuation separates words.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// True when any phrase appears in `text` as a run of whole words.
fn contains_phrase(text: &str, phrases: &[&str]) -> bool {
    let words = words(text);
    phrases.iter().any(|phrase| {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        !needle.is_empty()
            && words
                .windows(needle.len())
                .any(|window| window.iter().zip(&needle).all(|(w, n)| w.as_str() == *n))
    })
}

/// True when an experience entry is really an education entry.
///
/// A school name alone is not enough: a teaching assistant at a university is paid work.
/// The entry is academic when the position names a credential, when the organisation is a
/// school and no position is given, or when the description quotes a grade.
pub fn looks_academic(entry: &ExperienceEntry) -> bool {
    contains_phrase(&entry.position, CREDENTIAL_PHRASES)
        || (entry.position.trim().is_empty()
            && contains_phrase(&entry.company, INSTITUTION_KEYWORDS))
        || contains_phrase(&entry.description, GRADE_MARKERS)
}

fn to_education(entry: ExperienceEntry) -> EducationEntry {
    EducationEntry {
        institution: entry.company,
        degree: entry.position,
        field: String::new(),
        graduation_date: entry.end_date,
        gpa: String::new(),
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Removes exact duplicates, keeping first occurrences.
fn dedup_in_order<T: Eq + Hash + Clone>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

/// Moves academic entries out of `experience` and drops duplicates.
///
/// An academic entry whose institution and degree already appear together in `education`
/// is dropped rather than moved. Returns the number of entries taken out of `experience`.
pub fn enforce_section_placement(content: &mut ResumeContent) -> usize {
    let (academic, work): (Vec<_>, Vec<_>) = std::mem::take(&mut content.experience)
        .into_iter()
        .partition(looks_academic);
    content.experience = work;
    let moved = academic.len();

    for entry in academic {
        let duplicate = content.education.iter().any(|e| {
            same_text(&e.institution, &entry.company) && same_text(&e.degree, &entry.position)
        });
        if !duplicate {
            content.education.push(to_education(entry));
        }
    }

    dedup_in_order(&mut content.experience);
    dedup_in_order(&mut content.education);
    dedup_in_order(&mut content.project);
    dedup_in_order(&mut content.skills);

    moved
}
