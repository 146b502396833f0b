//! `shodan-harvest facets` — list the harvested categories.

use crate::cli::output;
use crate::facets;
use anyhow::Result;

/// Print the facet category list, one per line (or as a JSON array).
pub async fn run() -> Result<()> {
    if output::is_json() {
        output::print_json(&facets::FACETS);
        return Ok(());
    }
    for facet in facets::FACETS {
        println!("{facet}");
    }
    Ok(())
}
