use anyhow::bail;
use clap::Parser;
use tracing::info;

use todo_tag_conformance::{init_logging, run_suite, BackendClient, SuiteConfig};

fn main() -> anyhow::Result<()> {
    let config = SuiteConfig::parse();
    init_logging(&config.log_level);

    let client = BackendClient::new(&config.api_root)?;
    info!(api_root = client.api_root(), group = ?config.group, "running conformance suite");

    let report = run_suite(&client, config.group.as_deref());
    print!("{report}");

    if !report.is_success() {
        bail!("{} of {} scenarios failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}
