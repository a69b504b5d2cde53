//! Cross-check command - compare before and after images of a resolved issue

use std::path::Path;

use civicverify::api::AppState;
use civicverify::config::Config;
use civicverify::core::models::VerificationStatus;
use civicverify::core::services::parse_cross_check;
use civicverify::output::{OutputMode, Render};

use super::{read_request, runtime};

/// Cross-verify the resolution described by a request file
pub fn cross_check(
    file: &Path,
    strict: bool,
    config: Config,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let submission = parse_cross_check(&read_request(file)?)?;
    let state = AppState::open(config)?;

    let outcome =
        runtime()?.block_on(state.cross_verifier().cross_check_submission(submission))?;
    outcome.render(mode);

    if strict && outcome.status == VerificationStatus::Rejected {
        anyhow::bail!("Resolution of issue #{} was rejected", outcome.issue_id);
    }
    Ok(())
}
