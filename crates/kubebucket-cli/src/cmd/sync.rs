//! Sync command

use anyhow::Result;
use kubebucket_core::{BucketConfig, Generator};

/// Refresh `kubectl.json` and the per-line manifests.
pub async fn sync(config: BucketConfig) -> Result<()> {
    let dry_run = config.dry_run;
    let generator = Generator::new(config)?;
    let summary = generator.sync().await?;

    if dry_run {
        println!("✓ Dry run: {summary}");
    } else {
        println!("✓ Sync complete: {summary}");
    }
    Ok(())
}
