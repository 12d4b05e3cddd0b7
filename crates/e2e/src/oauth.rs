//! OAuth login page collaborator
//!
//! The hosted namespace browser sits behind Google OAuth. Signing in walks
//! the account chooser's email and password screens and then approves the
//! access grant. Only invoked for the two protected hosts; selectors match
//! the accounts login page the hosted deployments redirect to.

use std::time::Duration;

use tracing::info;

use crate::error::HarnessResult;
use nsb_webdriver::Session;

const EMAIL_FIELD: &str = "#Email";
const EMAIL_NEXT_BUTTON: &str = "#next";
const PASSWORD_FIELD: &str = "#Passwd";
const SIGN_IN_BUTTON: &str = "#signIn";
const APPROVE_ACCESS_BUTTON: &str = "#submit_approve_access";

const PAGE_TRANSITION_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Account credentials for the OAuth-protected deployments
#[derive(Debug, Clone)]
pub struct OauthCredentials {
    pub email: String,
    pub password: String,
}

/// Complete the OAuth login flow in the current window
pub async fn login(session: &Session, credentials: &OauthCredentials) -> HarnessResult<()> {
    info!("Signing in through the OAuth login page");

    session
        .wait_clickable(EMAIL_FIELD, PAGE_TRANSITION_TIMEOUT, POLL_INTERVAL)
        .await?;
    session.fill(EMAIL_FIELD, &credentials.email).await?;
    session.click(EMAIL_NEXT_BUTTON).await?;

    session
        .wait_clickable(PASSWORD_FIELD, PAGE_TRANSITION_TIMEOUT, POLL_INTERVAL)
        .await?;
    session.fill(PASSWORD_FIELD, &credentials.password).await?;
    session.click(SIGN_IN_BUTTON).await?;

    // The approval button is disabled for a moment after the page renders.
    session
        .wait_clickable(APPROVE_ACCESS_BUTTON, PAGE_TRANSITION_TIMEOUT, POLL_INTERVAL)
        .await?;
    session.click(APPROVE_ACCESS_BUTTON).await?;

    info!("OAuth access approved");
    Ok(())
}
