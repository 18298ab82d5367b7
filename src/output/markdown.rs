//! Markdown report generation
//!
//! Renders a search report as a page: one heading for the location, one
//! section per listing with its URL and detail sections.

use crate::output::report::{OutputResult, SearchReport};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of `report` to `output_path`
///
/// # Arguments
///
/// * `report` - The search report to render
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to format or write the report
pub fn write_report(report: &SearchReport, output_path: &Path) -> OutputResult<()> {
    let markdown = render_markdown(report)?;

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a search report as markdown
pub fn render_markdown(report: &SearchReport) -> OutputResult<String> {
    let mut md = String::new();

    md.push_str(&format!("# Results for \"{}\"\n\n", report.location));
    md.push_str(&format!("- **Search URL**: {}\n", report.search_url));
    md.push_str(&format!("- **Listings**: {}\n\n", report.listings.len()));

    if report.listings.is_empty() {
        md.push_str("_No listings found._\n");
        return Ok(md);
    }

    for (index, item) in report.listings.iter().enumerate() {
        md.push_str(&format!("## Listing {}\n\n", index + 1));

        if item.url.is_empty() {
            md.push_str("- **URL**: unknown\n");
        } else {
            md.push_str(&format!("- **URL**: <{}>\n", item.url));
        }

        if let Some(label) = item.listing.get("avgRatingA11yLabel").and_then(|v| v.as_str()) {
            md.push_str(&format!("- **Rating**: {}\n", label));
        }
        md.push('\n');

        match &item.details {
            Some(details) => {
                md.push_str("```json\n");
                md.push_str(&serde_json::to_string_pretty(details)?);
                md.push_str("\n```\n\n");
            }
            None => md.push_str("_Details unavailable._\n\n"),
        }
    }

    Ok(md)
}
