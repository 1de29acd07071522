//! Term listing formatters

use glosslint_core::TermCatalog;
use miette::{IntoDiagnostic, Result};

pub fn output_terms_text(catalog: &TermCatalog) {
    for term in catalog.iter() {
        println!("{} - {}", term.id, term.display_name);
        for pattern in &term.patterns {
            println!("    {:?}: {}", pattern.kind(), pattern.literal());
        }
    }

    println!();
    println!(
        "{} terms, {} warnings",
        catalog.len(),
        catalog.warnings().len()
    );
}

pub fn output_terms_json(catalog: &TermCatalog) -> Result<()> {
    let output: Vec<_> = catalog
        .iter()
        .map(|term| {
            serde_json::json!({
                "id": term.id,
                "display_name": term.display_name,
                "source": term.source.display().to_string(),
                "patterns": term
                    .patterns
                    .iter()
                    .map(|p| serde_json::json!({
                        "kind": p.kind(),
                        "literal": p.literal(),
                        "regex": p.as_str(),
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&output).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}
