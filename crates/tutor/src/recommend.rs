//! Keyword-driven recommendations over the static catalog.
//!
//! Every function here is pure: same catalog and inputs, same output, in
//! category declaration order then table order. Nothing is synthesized; each
//! returned item comes straight from the catalog.

use tutorly_catalog::{Catalog, Category, DEFAULT_PATH_ID};
use tutorly_core::profile::{KnowledgeLevel, Profile};
use tutorly_core::session::{Recommendations, Resource};

/// Maximum number of project ideas returned.
pub const MAX_PROJECT_IDEAS: usize = 5;

/// Keywords this short only count as whole words ("ai" must not match "blockchain").
const WHOLE_WORD_MAX_LEN: usize = 2;

fn keyword_matches(haystack: &str, keyword: &str) -> bool {
    if keyword.len() <= WHOLE_WORD_MAX_LEN {
        haystack
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    } else {
        haystack.contains(keyword)
    }
}

/// Categories whose keywords appear in `interests`, in declaration order.
pub fn matching_categories(catalog: &Catalog, interests: &str) -> Vec<Category> {
    let interests = interests.to_lowercase();
    catalog
        .categories()
        .filter(|(_, tables)| tables.keywords.iter().any(|k| keyword_matches(&interests, k)))
        .map(|(category, _)| category)
        .collect()
}

/// Learning path ids for a level and free-text interests.
///
/// Beginners get the `_beginner` variant of each matching category;
/// intermediate and advanced learners get `_intermediate`. Anything else,
/// including no keyword match, yields the single default path.
pub fn recommend_paths(catalog: &Catalog, level: KnowledgeLevel, interests: &str) -> Vec<String> {
    let level = level.label().to_lowercase();
    let variant = if level.contains("beginner") {
        Some("beginner")
    } else if level.contains("intermediate") || level.contains("advanced") {
        Some("intermediate")
    } else {
        None
    };

    let paths: Vec<String> = match variant {
        Some(variant) => matching_categories(catalog, interests)
            .into_iter()
            .map(|category| format!("{}_{variant}", category.key()))
            .collect(),
        None => Vec::new(),
    };

    if paths.is_empty() {
        vec![DEFAULT_PATH_ID.to_string()]
    } else {
        paths
    }
}

/// Resources for every matching category, or one starter resource per
/// category when nothing matches.
pub fn recommend_resources(catalog: &Catalog, interests: &str) -> Vec<Resource> {
    let matched = matching_categories(catalog, interests);
    if matched.is_empty() {
        return catalog
            .categories()
            .filter_map(|(_, tables)| tables.resources.first().cloned())
            .collect();
    }

    matched
        .into_iter()
        .flat_map(|category| catalog.category(category).resources.iter().cloned())
        .collect()
}

/// Project ideas for the categories behind `paths`, at most five.
pub fn get_project_ideas(catalog: &Catalog, paths: &[String]) -> Vec<String> {
    let mut categories: Vec<Category> = Vec::new();
    for category in paths.iter().filter_map(|id| Category::from_path_id(id)) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    if categories.is_empty() {
        let python = &catalog.category(Category::Python).projects;
        let data = &catalog.category(Category::DataScience).projects;
        return python
            .iter()
            .take(3)
            .chain(data.iter().take(2))
            .cloned()
            .collect();
    }

    categories
        .into_iter()
        .flat_map(|category| catalog.category(category).projects.iter().cloned())
        .take(MAX_PROJECT_IDEAS)
        .collect()
}

/// Everything the Resources tab shows for a profile.
pub fn recommend(catalog: &Catalog, profile: &Profile) -> Recommendations {
    let paths = recommend_paths(catalog, profile.knowledge_level, &profile.interests);
    let resources = recommend_resources(catalog, &profile.interests);
    let projects = get_project_ideas(catalog, &paths);
    Recommendations {
        paths,
        resources,
        projects,
    }
}
