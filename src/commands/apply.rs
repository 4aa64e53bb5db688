//! Batch-apply mode: reconcile a desired-state document against a target
//! instance.

use crate::cli::{ApplyArgs, Cli};
use crate::client::ArtifactoryClient;
use crate::config::Document;
use crate::engine::{ConsoleReport, Engine};
use crate::resolve::{self, Overrides, TerminalPrompt};
use crate::ui;
use anyhow::Result;
use colored::Colorize;

/// Exit code for a usage/syntax problem (missing or unreadable config file).
const EXIT_USAGE: i32 = 2;
/// Exit code when one or more operations failed. Skipped conflicts do not
/// fail the run.
const EXIT_FAILED_OPERATIONS: i32 = 1;

pub fn run(cli: &Cli, args: &ApplyArgs) -> Result<()> {
    let Some(config_file) = args.config_file.as_deref() else {
        ui::error("no configFile given (use -c/--configFile)");
        print_config_syntax();
        std::process::exit(EXIT_USAGE);
    };

    ui::info("artifactl apply started.");

    // A missing, unreadable, or malformed config file is a usage problem,
    // not a failed operation.
    let doc = match Document::load(config_file) {
        Ok(doc) => doc,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            print_config_syntax();
            std::process::exit(EXIT_USAGE);
        }
    };
    if args.debug {
        println!("=== configFile: {}", config_file.display());
        println!("=== config: {doc:?}");
    }

    let overrides = Overrides {
        // -t wins; the global -s is accepted as an alias for convenience
        target_server: args.target_server.clone().or_else(|| cli.server.clone()),
        username: cli.username.clone(),
        password: cli.password.clone(),
        destructive: args.destructive,
        safe: args.safe,
    };
    let ctx = resolve::resolve(&overrides, &doc, &mut TerminalPrompt)?;

    if ctx.destructive {
        println!();
        ui::warn(
            &"DESTRUCTIVE flag is set; any creates will replace existing entities."
                .red()
                .bold()
                .to_string(),
        );
    }

    println!();
    ui::kv("Target Artifactory Instance", &ctx.base_url);
    if !ctx.context_path.is_empty() {
        ui::kv("Public context path", &ctx.context_path);
    }

    let client = ArtifactoryClient::new(&ctx);
    let mut engine = Engine::new(&client, ctx.destructive);
    let mut report = ConsoleReport;
    let summary = engine.run(&doc, &mut report);

    println!();
    ui::info("artifactl apply complete.");

    if !summary.is_success() {
        std::process::exit(EXIT_FAILED_OPERATIONS);
    }
    Ok(())
}

/// Shown when the config file is absent, unreadable, or malformed.
fn print_config_syntax() {
    println!();
    println!("A configuration file is a JSON document with these top-level sections:");
    println!();
    println!(
        r#"  {{
    "artifactory":  {{ "hostname" | "baseURL" | "targetServer", "username", "password",
                      "health": true, "information": true, "configuration": true }},
    "license":      {{ "information": true, "install": {{ "licenseFile": "<path>" }} }},
    "users":        {{ "list", "detail": [..], "create": {{id: payload}},
                      "createFromFile": ["<path>", ..], "update": {{id: payload}},
                      "updateFromFile": ["<path>", ..], "delete": [..] }},
    "groups":       {{ .. as users .. }},
    "repositories": {{ "list": ["local","remote","virtual"], .. as users .. }},
    "permissions":  {{ .. as users .. }},
    "destructive":  false,
    "safe":         false,
    "serverPublicContextPath": "artifactory"
  }}"#
    );
}
