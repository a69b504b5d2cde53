//! Verify command - run every check on a new issue report

use std::path::Path;

use civicverify::api::AppState;
use civicverify::config::Config;
use civicverify::core::models::VerificationStatus;
use civicverify::core::services::parse_submission;
use civicverify::output::{OutputMode, Render};

use super::{read_request, runtime};

/// Verify the issue described by a request file
pub fn verify(file: &Path, strict: bool, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let submission = parse_submission(&read_request(file)?)?;
    let state = AppState::open(config)?;

    let outcome = runtime()?.block_on(state.verifier().verify_submission(submission))?;
    outcome.render(mode);

    if strict && outcome.status == VerificationStatus::Rejected {
        anyhow::bail!("Issue #{} was rejected", outcome.issue_id);
    }
    Ok(())
}
