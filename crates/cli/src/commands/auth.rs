//! `cohort auth` - the stored session.

use std::io::Write;

use clap::Subcommand;
use cohort_client::auth::AuthSession;
use cohort_core::User;

use crate::error::CliError;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a session issued by the OTP login flow
    Login {
        /// Bearer token returned on OTP verification
        #[arg(long)]
        token: String,

        #[arg(long)]
        user_id: String,

        /// Phone number without country code
        #[arg(long)]
        phone: String,

        /// Country calling code, e.g. 91
        #[arg(long)]
        country_code: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show whether a session is stored
    Status,
}

/// Run an auth subcommand against the local store.
///
/// # Errors
///
/// Returns an error if login is rejected or output cannot be written.
pub fn run(action: AuthAction, out: &mut impl Write) -> Result<(), CliError> {
    let session = AuthSession::load(super::local_store());

    match action {
        AuthAction::Login {
            token,
            user_id,
            phone,
            country_code,
            name,
            email,
        } => {
            let mut user = User::new(user_id, phone, country_code);
            user.name = name;
            user.email = email;
            session.login(&token, user)?;
            if let Some(user) = session.user() {
                writeln!(out, "Signed in as {}", user.display_name())?;
            }
        }
        AuthAction::Logout => {
            session.logout();
            writeln!(out, "Signed out")?;
        }
        AuthAction::Status => {
            if !session.check_auth() {
                writeln!(out, "Not signed in")?;
                return Ok(());
            }
            if let Some(user) = session.user() {
                writeln!(out, "Signed in as {} [{}]", user.display_name(), user.id)?;
                writeln!(out, "Phone: {}", user.international_phone())?;
                if let Some(email) = &user.email {
                    writeln!(out, "Email: {email}")?;
                }
            }
        }
    }
    Ok(())
}
