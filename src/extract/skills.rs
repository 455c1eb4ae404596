//! Catalog-driven skill matching.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::catalog::SkillCatalog;

/// Skills found in a text.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SkillMatches {
    /// Category to sorted canonical names
    pub categorized: BTreeMap<String, Vec<String>>,
    /// Sorted union of every category
    pub flat: Vec<String>,
}

#[derive(Debug, Clone)]
struct Variation {
    needle: String,
    canonical: String,
    category: String,
}

/// Matches text against every surface form in a [`SkillCatalog`].
///
/// Build once per catalog; matching borrows the matcher immutably and is
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    variations: Vec<Variation>,
}

impl SkillMatcher {
    pub fn new(catalog: &SkillCatalog) -> Self {
        let mut variations: Vec<Variation> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for skill in &catalog.skills {
            let forms = std::iter::once(&skill.canonical_name).chain(skill.variations.iter());
            for form in forms {
                let needle = form.to_lowercase();
                if needle.is_empty() {
                    continue;
                }
                let variation = Variation {
                    needle: needle.clone(),
                    canonical: skill.canonical_name.clone(),
                    category: skill.category.clone(),
                };
                // a later entry claims the form but keeps its position
                match index.get(&needle) {
                    Some(&i) => variations[i] = variation,
                    None => {
                        index.insert(needle, variations.len());
                        variations.push(variation);
                    }
                }
            }
        }

        // longest forms first; stable, so ties keep catalog order
        variations.sort_by(|a, b| b.needle.chars().count().cmp(&a.needle.chars().count()));

        log::debug!("skill matcher built with {} variations", variations.len());
        Self { variations }
    }

    /// Find every catalog skill mentioned in `text`.
    pub fn match_skills(&self, text: &str) -> SkillMatches {
        let haystack = text.to_lowercase();
        let mut matched: HashSet<&str> = HashSet::new();
        let mut found: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for variation in &self.variations {
            if matched.contains(variation.canonical.as_str()) {
                continue;
            }
            if contains_bounded(&haystack, &variation.needle) {
                found
                    .entry(variation.category.clone())
                    .or_default()
                    .insert(variation.canonical.clone());
                matched.insert(&variation.canonical);
            }
        }

        let flat: BTreeSet<String> = found.values().flatten().cloned().collect();
        SkillMatches {
            categorized: found
                .into_iter()
                .map(|(category, names)| (category, names.into_iter().collect()))
                .collect(),
            flat: flat.into_iter().collect(),
        }
    }
}

/// An occurrence of `needle` not touching an ASCII letter or digit on
/// either side.
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();

        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        let bounded = |c: Option<char>| c.map_or(true, |c| !c.is_ascii_alphanumeric());
        if bounded(before) && bounded(after) {
            return true;
        }

        // retry one character further so overlapping occurrences are seen
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
