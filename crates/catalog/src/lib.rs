//! The learning catalog: learning paths, resources, and project ideas.
//!
//! The catalog is immutable data. The built-in copy is embedded from
//! `catalog.toml` at compile time and parsed once at startup; a deployment may
//! point `[catalog] path` at its own file with the same layout. Everything
//! downstream only reads it, through `Arc<Catalog>`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tutorly_core::error::CatalogError;
use tutorly_core::session::Resource;

const BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

/// Path returned when nothing in a learner's interests matches.
pub const DEFAULT_PATH_ID: &str = "python_beginner";

/// A subject category. Declaration order is the output order of every
/// recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Python,
    DataScience,
    Ai,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Python, Category::DataScience, Category::Ai];

    fn index(&self) -> usize {
        match self {
            Category::Python => 0,
            Category::DataScience => 1,
            Category::Ai => 2,
        }
    }

    /// Table key, also the prefix of this category's learning path ids.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Python => "python",
            Category::DataScience => "data_science",
            Category::Ai => "ai",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Python => "Python",
            Category::DataScience => "Data Science",
            Category::Ai => "AI",
        }
    }

    /// The category a learning path belongs to, by id prefix.
    pub fn from_path_id(path_id: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| {
            path_id
                .strip_prefix(c.key())
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }
}

/// A curriculum outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    pub description: String,
    pub modules: Vec<String>,
}

/// Per-category tables.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTables {
    pub keywords: Vec<String>,
    pub resources: Vec<Resource>,
    pub projects: Vec<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    paths: Vec<LearningPath>,
    categories: HashMap<String, CategoryTables>,
}

/// The parsed, validated catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    paths: Vec<LearningPath>,
    /// Indexed by `Category::index`.
    categories: [CategoryTables; 3],
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Load from `path`, or fall back to the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), paths = catalog.paths.len(), "Loaded custom catalog");
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let mut raw: RawCatalog =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut take = |category: Category| -> Result<CategoryTables, CatalogError> {
            let mut tables = raw
                .categories
                .remove(category.key())
                .ok_or_else(|| CatalogError::MissingCategory(category.key().into()))?;
            if tables.resources.is_empty() {
                return Err(CatalogError::Parse(format!(
                    "category '{}' has no resources",
                    category.key()
                )));
            }
            for keyword in &mut tables.keywords {
                *keyword = keyword.to_lowercase();
            }
            Ok(tables)
        };
        let categories = [
            take(Category::Python)?,
            take(Category::DataScience)?,
            take(Category::Ai)?,
        ];

        let catalog = Self {
            paths: raw.paths,
            categories,
        };
        if catalog.path(DEFAULT_PATH_ID).is_none() {
            return Err(CatalogError::UnknownPath(DEFAULT_PATH_ID.into()));
        }
        Ok(catalog)
    }

    /// Look up a learning path by id.
    pub fn path(&self, id: &str) -> Option<&LearningPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// All learning paths, in file order.
    pub fn paths(&self) -> &[LearningPath] {
        &self.paths
    }

    pub fn category(&self, category: Category) -> &CategoryTables {
        &self.categories[category.index()]
    }

    /// Categories with their tables, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &CategoryTables)> {
        Category::ALL.into_iter().zip(self.categories.iter())
    }
}
