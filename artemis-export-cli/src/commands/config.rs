//! Credentials configuration subcommands.

use std::io::Write;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use artemis_export_scraper::{CredentialSource, Credentials};

/// Mask a string, showing only the first 2 characters.
fn mask_value(s: &str) -> String {
    if s.len() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", &s[..2])
    }
}

/// Show current credentials and their sources.
pub(crate) fn run_config_show() {
    let path = artemis_export_scraper::config_path();
    let sources = artemis_export_scraper::credential_sources();
    let creds = Credentials::load();

    println!(
        "{}",
        "Provider Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match &path {
        Some(p) if p.exists() => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    println!();

    let fields: &[(&str, &CredentialSource, Option<&str>)] = &[
        (
            "steamgriddb api_key",
            &sources.steamgriddb_api_key,
            creds.steamgriddb_api_key.as_deref(),
        ),
        (
            "igdb client_id",
            &sources.igdb_client_id,
            creds.igdb_client_id.as_deref(),
        ),
        (
            "igdb client_secret",
            &sources.igdb_client_secret,
            creds.igdb_client_secret.as_deref(),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    mask_value(v),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    if !creds.any_configured() {
        println!();
        println!(
            "{}",
            "No provider credentials configured; exports run without enrichment."
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        println!("Run 'artemis-export config setup' to add them.");
    }
}

/// Interactively set up credentials.
pub(crate) fn run_config_setup() {
    println!(
        "{}",
        "Provider Credential Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let existing = Credentials::load();

    let read_line = |prompt: &str, default: Option<&str>| -> Option<String> {
        if let Some(def) = default {
            print!("  {} [{}]: ", prompt, mask_value(def));
        } else {
            print!("  {}: ", prompt);
        }
        std::io::stdout().flush().expect("stdout flush");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input).expect("stdin read");
        let trimmed = input.trim().to_string();

        if trimmed.is_empty() {
            return default.map(|d| d.to_string());
        }
        Some(trimmed)
    };

    println!(
        "  {}",
        "All fields are optional; press Enter to keep or skip.".if_supports_color(Stdout, |t| t.dimmed()),
    );
    println!();

    let steamgriddb_api_key = read_line(
        "SteamGridDB API key",
        existing.steamgriddb_api_key.as_deref(),
    );
    let igdb_client_id = read_line("IGDB client id", existing.igdb_client_id.as_deref());
    let igdb_client_secret = read_line(
        "IGDB client secret",
        existing.igdb_client_secret.as_deref(),
    );

    let creds = Credentials {
        steamgriddb_api_key,
        igdb_client_id,
        igdb_client_secret,
    };

    match artemis_export_scraper::save_to_file(&creds) {
        Ok(path) => {
            println!();
            println!(
                "{} Credentials saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!(
                "{} Failed to save credentials: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() {
    match artemis_export_scraper::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    }
}
