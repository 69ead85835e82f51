use taskdeck_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            page_size,
            request_timeout_secs,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            ProfileUpdate {
                api_base_url,
                page_size,
                request_timeout_secs,
            },
            no_activate,
        ),
        ConfigCommands::Show { profile } => run_config_show(profile.as_deref().or(global_profile)),
    }
}

/// Values passed to `config init`; unset fields keep what the profile has.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub api_base_url: Option<String>,
    pub page_size: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

pub fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    apply_profile_update(profile, update)?;
    let resolved = profile.client_config()?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    println!(
        "API: {} (page size {})",
        resolved.api_base_url, resolved.page_size
    );
    println!(
        "Run `taskdeck --profile {profile_name} auth login --email <email> --password <password>` to sign in."
    );
    Ok(())
}

pub fn apply_profile_update(profile: &mut CliProfile, update: ProfileUpdate) -> Result<(), CliError> {
    if let Some(url) = normalize_text_option(update.api_base_url) {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
        profile.api_base_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(page_size) = update.page_size {
        if page_size == 0 {
            return Err(CliError::Config(
                "page_size must be at least 1".to_string(),
            ));
        }
        profile.page_size = Some(page_size);
    }
    if let Some(secs) = update.request_timeout_secs {
        profile.request_timeout_secs = (secs > 0).then_some(secs);
    }
    Ok(())
}

fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let resolved = profile.client_config()?;

    println!("Config file: {}", default_config_path().map_err(CliError::Config)?.display());
    println!("Profile:     {profile_name}");
    println!("API:         {}", resolved.api_base_url);
    println!("Page size:   {}", resolved.page_size);
    match resolved.request_timeout {
        Some(timeout) => println!("Timeout:     {}s", timeout.as_secs()),
        None => println!("Timeout:     default"),
    }
    Ok(())
}
