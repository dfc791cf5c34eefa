use crate::cli::{
    actions::{Action, Backend, ServerArgs},
    commands::{
        ARG_ADMIN_PATH, ARG_DSN, ARG_LOGIN_TITLE, ARG_LOGO_URL, ARG_PORT, ARG_SECURE_COOKIES,
        ARG_SESSION_PREFIX, ARG_STORE,
    },
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use url::Url;

fn string_arg(matches: &clap::ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

/// Map parsed arguments to an action.
/// # Errors
/// Returns an error if the Postgres backend is selected without a valid DSN.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let backend = match string_arg(matches, ARG_STORE).as_deref() {
        Some("memory") => Backend::Memory,
        _ => {
            let dsn = string_arg(matches, ARG_DSN)
                .ok_or_else(|| anyhow!("missing required argument: --dsn"))?;
            Url::parse(&dsn).context("invalid --dsn")?;
            Backend::Postgres {
                dsn: SecretString::from(dsn),
            }
        }
    };

    Ok(Action::Server(ServerArgs {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        backend,
        admin_path: string_arg(matches, ARG_ADMIN_PATH).unwrap_or_else(|| "/admin".to_string()),
        session_prefix: string_arg(matches, ARG_SESSION_PREFIX)
            .unwrap_or_else(|| "gatehouse:login_user".to_string()),
        secure_cookies: matches.get_flag(ARG_SECURE_COOKIES),
        login_title: string_arg(matches, ARG_LOGIN_TITLE)
            .unwrap_or_else(|| "Login to your account".to_string()),
        logo_url: string_arg(matches, ARG_LOGO_URL),
    }))
}
