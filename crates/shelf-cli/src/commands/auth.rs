use color_eyre::Result;
use serde_json::json;

use super::context::AppContext;
use super::progress::Spinner;
use super::prompts;
use crate::output::Output;

pub async fn run_login(email: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_required("Email")?,
    };
    let password = prompts::prompt_password("Password")?;

    let mut client = ctx.client()?;
    let spinner = Spinner::start(format!("Signing in to {}...", client.base_url()));
    let username = ctx.session.login(&mut client, &email, &password).await?;
    spinner.finish();

    let shown = username.unwrap_or_else(|| email.clone());
    if output.is_human() {
        output.success(format!("Signed in as {}", shown));
    } else {
        output.json(&json!({ "type": "login", "username": shown, "email": email }));
    }
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    if ctx.session.logout()? {
        output.success("Signed out");
    } else {
        output.info("No active session");
    }
    Ok(())
}

pub async fn run_whoami(verify: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    if !ctx.session.is_logged_in() {
        output.warn("Not signed in. Run `shelf login` first.");
        return Ok(());
    }

    let claims = ctx.session.claims().unwrap_or_default();
    let username = claims.username();
    let expires = claims.expires_at().map(|at| at.to_rfc3339());

    let server_valid = if verify {
        let spinner = Spinner::start("Verifying session...");
        let status = ctx.client()?.verify_token().await?;
        spinner.finish();
        Some(status.valid)
    } else {
        None
    };

    if output.is_human() {
        output.info(format!("Username: {}", username.as_deref().unwrap_or("<unknown>")));
        if let Some(email) = ctx.session.email() {
            output.info(format!("Email:    {}", email));
        }
        if let Some(expires) = &expires {
            output.info(format!("Expires:  {}", expires));
        }
        match server_valid {
            Some(true) => output.success("Session is valid"),
            Some(false) => output.warn("Session was rejected by the server. Run `shelf login` again."),
            None => {}
        }
    } else {
        output.json(&json!({
            "username": username,
            "email": ctx.session.email(),
            "expires_at": expires,
            "valid": server_valid,
        }));
    }
    Ok(())
}
