//! `tutorly doctor` — Diagnose configuration and credentials.

use std::path::Path;
use tutorly_catalog::Catalog;
use tutorly_config::AppConfig;
use tutorly_core::Provider;

pub async fn run(config_path: Option<&Path>, ping: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Tutorly Doctor");
    println!("=================\n");

    let mut issues = 0;

    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(&default_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults (run `tutorly init`)", path.display());
    }

    let config = match AppConfig::load_with(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid (provider: {}, model: {})", config.provider, config.model);
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. Fix the config and re-run.");
            return Ok(());
        }
    };

    match config.require_api_key() {
        Ok(_) => println!("  ✅ API key configured"),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    match Catalog::load(config.catalog.path.as_deref()) {
        Ok(catalog) => println!("  ✅ Catalog loaded ({} learning paths)", catalog.paths().len()),
        Err(e) => {
            println!("  ❌ Catalog invalid: {e}");
            issues += 1;
        }
    }

    if ping && issues == 0 {
        let provider = tutorly_providers::router::build_from_config(&config)?.active()?;
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  ❌ Provider '{}' rejected the health check", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
