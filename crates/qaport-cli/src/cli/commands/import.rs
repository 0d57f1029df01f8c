//! `qaport import`: JUnit XML → Xray Test Execution.

use anyhow::{bail, Context, Result};
use chrono::Local;
use qaport_core::{aggregate, description, parse_file, summary, Aggregation, RunInfo, RunParams};
use qaport_core::{ParsedResults, TestMapping};
use qaport_xray::{MappingCache, XrayClient, XrayConfig};
use tracing::{debug, info};

use super::print_header;
use crate::cli::args::ImportArgs;
use crate::exit_codes::SUCCESS;

/// Unmatched names listed before the rest is summarized.
const UNMATCHED_PREVIEW: usize = 10;

pub async fn run(args: ImportArgs) -> Result<i32> {
    let config = XrayConfig::from_env().context("Jira credentials are required")?;
    let client = XrayClient::new(config)?;
    let cache = MappingCache::new(&args.mapping_file);

    print_header("STEP 1: Load test mapping");
    let mapping = load_mapping(&client, &cache, &args).await?;

    print_header("STEP 2: Parse test results");
    println!("Parsing: {}", args.junit_xml.display());
    let results = parse_file(&args.junit_xml)
        .with_context(|| format!("failed to read test results from {}", args.junit_xml.display()))?;
    print_counts(&results);

    print_header("STEP 3: Match results to Xray tests");
    let aggregation = aggregate(&results, &mapping);
    print_matching(&aggregation);

    if args.dry_run {
        print_header("DRY RUN - No execution created");
        return Ok(SUCCESS);
    }

    if aggregation.matched.is_empty() {
        bail!("No matched tests to report");
    }

    print_header("STEP 4: Create Test Execution");
    let now = Local::now();
    let params = RunParams {
        environment: args.test_environment.clone(),
        version: args.version.clone(),
        custom_summary: args.execution_summary.clone(),
    };

    let execution_key = match &args.execution_key {
        Some(key) => {
            println!("   Using existing: {}", key);
            key.clone()
        }
        None => {
            let title = summary(&params, &now);
            println!("   Creating: {}", title);
            let key = client
                .create_test_execution(&args.project_key, &title, &description(&results.counts, &now))
                .await
                .context("failed to create Test Execution")?;
            println!("   [OK] Created: {}", key);
            key
        }
    };

    print_header("STEP 5: Import results");
    let test_keys = aggregation.keys();
    println!("   Adding {} tests...", test_keys.len());
    client
        .add_tests_to_execution(&execution_key, &test_keys)
        .await
        .with_context(|| format!("failed to add tests to {}", execution_key))?;

    println!("   Importing results...");
    let response = client
        .import_execution_results(&execution_key, &aggregation.entries())
        .await
        .with_context(|| format!("failed to import results into {}", execution_key))?;
    debug!(response = %response, "import response");
    println!("   [OK] Done");

    let run_info = RunInfo::new(
        &execution_key,
        client.base_url(),
        &params,
        &results.counts,
        &aggregation,
        &now,
    );
    run_info
        .write_to(&args.info_out)
        .with_context(|| format!("failed to write {}", args.info_out.display()))?;
    info!(path = %args.info_out.display(), "run info written");

    print_header("SUCCESS");
    println!("   Execution: {}", run_info.execution_key);
    println!("   URL: {}", run_info.execution_url);
    println!("   Tests: {} imported", aggregation.matched.len());

    Ok(SUCCESS)
}

/// Cached mapping unless a refresh is forced; an empty cache triggers a fetch.
async fn load_mapping(
    client: &XrayClient,
    cache: &MappingCache,
    args: &ImportArgs,
) -> Result<TestMapping> {
    let cached = if args.refresh_mapping {
        TestMapping::new()
    } else {
        cache.load().await
    };
    if !cached.is_empty() {
        println!("[OK] Loaded {} tests from cache", cached.len());
        return Ok(cached);
    }

    println!("\n[INFO] Fetching tests from Test Set '{}'...", args.test_set);
    let mapping = MappingCache::fetch_from_xray(client, &args.project_key, &args.test_set)
        .await
        .with_context(|| format!("failed to fetch Test Set '{}'", args.test_set))?;

    if mapping.is_empty() {
        bail!(
            "No tests found in Test Set '{}' of project {}",
            args.test_set,
            args.project_key
        );
    }

    cache
        .save(&mapping)
        .await
        .with_context(|| format!("failed to save {}", cache.path().display()))?;
    println!("   [OK] Built mapping for {} tests", mapping.len());
    Ok(mapping)
}

fn print_counts(results: &ParsedResults) {
    let counts = &results.counts;
    println!(
        "\n   Total: {} | Passed: {} | Failed: {} | Skipped: {}",
        counts.total, counts.passed, counts.failed, counts.skipped
    );
}

fn print_matching(aggregation: &Aggregation) {
    println!(
        "   Matched: {} | Unmatched: {}",
        aggregation.matched.len(),
        aggregation.unmatched.len()
    );

    if aggregation.unmatched.is_empty() {
        return;
    }
    println!("\n   [WARN] Unmatched tests:");
    for name in aggregation.unmatched.iter().take(UNMATCHED_PREVIEW) {
        println!("      - {}", name);
    }
    if aggregation.unmatched.len() > UNMATCHED_PREVIEW {
        println!(
            "      ... and {} more",
            aggregation.unmatched.len() - UNMATCHED_PREVIEW
        );
    }
}
