//! Export the ledger API's OpenAPI document as JSON
//!
//! Usage:
//!   export_openapi > openapi.json
//!   export_openapi --output docs/openapi.json

use anyhow::Context;
use internal_transfers::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

fn get_output_path() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--output" || args[i] == "-o") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("failed to serialize OpenAPI document")?;

    match get_output_path() {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("failed to write {}", path))?;
            eprintln!("✅ OpenAPI document exported to: {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
