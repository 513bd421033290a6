//! Backfill command

use anyhow::Result;
use kubebucket_core::{BucketConfig, Generator};

/// Generate one pinned manifest per historical release.
pub async fn backfill(config: BucketConfig, limit: Option<usize>) -> Result<()> {
    let dry_run = config.dry_run;
    let generator = Generator::new(config)?;
    let summary = generator.backfill(limit).await?;

    if dry_run {
        println!("✓ Dry run: {summary}");
    } else {
        println!("✓ Backfill complete: {summary}");
    }
    Ok(())
}
