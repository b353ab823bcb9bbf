//! `tutorly recommend` — Offline recommendations from the catalog.

use std::fmt::Write;
use std::path::Path;
use tutorly_catalog::Catalog;
use tutorly_config::AppConfig;
use tutorly_core::{KnowledgeLevel, Profile, Recommendations};
use tutorly_tutor::recommend;

pub fn run(
    config_path: Option<&Path>,
    level: KnowledgeLevel,
    interests: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_with(config_path)?;
    let catalog = Catalog::load(config.catalog.path.as_deref())?;

    let profile = Profile {
        knowledge_level: level,
        interests: interests.to_string(),
        ..Profile::default()
    };
    let recommendations = recommend::recommend(&catalog, &profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print!("{}", render(&catalog, &recommendations));
    }
    Ok(())
}

fn render(catalog: &Catalog, recommendations: &Recommendations) -> String {
    let mut out = String::from("📚 Learning paths\n");
    for id in &recommendations.paths {
        match catalog.path(id) {
            Some(path) => {
                let _ = writeln!(out, "   {} ({id})", path.title);
                let _ = writeln!(out, "      {}", path.description);
            }
            None => {
                let _ = writeln!(out, "   {id}");
            }
        }
    }

    out.push_str("\n🔗 Resources\n");
    for resource in &recommendations.resources {
        let _ = writeln!(out, "   {} — {}", resource.title, resource.url);
    }

    out.push_str("\n🛠  Project ideas\n");
    for idea in &recommendations.projects {
        let _ = writeln!(out, "   • {idea}");
    }
    out
}
