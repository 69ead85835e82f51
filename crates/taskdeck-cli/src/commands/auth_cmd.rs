use taskdeck_core::auth::{AuthApi, RegisterOutcome};
use taskdeck_core::validation::{LoginForm, RegistrationForm};
use taskdeck_core::{CredentialStore, Error};

use crate::cli::AuthCommands;
use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, context: &CliContext) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { email, password } => {
            let session = AuthApi::new(context.gateway.clone())
                .login(&LoginForm::new(email, password))
                .await
                .map_err(into_cli_error)?;
            println!(
                "Signed in profile '{}' as {}",
                context.profile_name, session.user_name
            );
            Ok(())
        }
        AuthCommands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm::new(username, email, password, confirm_password);
            let outcome = AuthApi::new(context.gateway.clone())
                .register(&form)
                .await
                .map_err(into_cli_error)?;
            match outcome {
                RegisterOutcome::SignedIn(session) => println!(
                    "Registered and signed in profile '{}' as {}",
                    context.profile_name, session.user_name
                ),
                RegisterOutcome::SignInRequired => println!(
                    "Account created. Run `taskdeck auth login --email <email> --password <password>` to sign in."
                ),
            }
            Ok(())
        }
        AuthCommands::Status => {
            match context.store.read() {
                Some(session) => println!(
                    "Profile '{}' is signed in as {} (user id {})",
                    context.profile_name, session.user_name, session.user_id
                ),
                None => println!("Profile '{}' is not signed in.", context.profile_name),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            context.signing_out_session().logout();
            println!("Signed out profile '{}'", context.profile_name);
            Ok(())
        }
    }
}

fn into_cli_error(error: Error) -> CliError {
    match error {
        Error::Validation(errors) => CliError::Invalid(errors),
        other => CliError::Core(other),
    }
}
