use anyhow::{Context, Result};

use sift::examples::{example01_user_search, example02_contact_search, example03_filter_criteria};

use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Walkthroughs",
    commands: &["sift demo                         # Run every walkthrough against the sample data"],
}];

pub async fn handle_demo(output: &OutputManager) -> Result<()> {
    output.heading("Search walkthroughs");

    output.verbose("Free-text search and user filters");
    example01_user_search::run()
        .await
        .context("user search walkthrough failed")?;
    output.success("user search");

    output.verbose("Contact paging and date ranges");
    example02_contact_search::run()
        .await
        .context("contact search walkthrough failed")?;
    output.success("contact search");

    output.verbose("Filter criteria and sort fallback");
    example03_filter_criteria::run()
        .await
        .context("filter criteria walkthrough failed")?;
    output.success("filter criteria");

    Ok(())
}
