//! Terminal implementations of the library's view seams.

use taskdeck_core::{Navigator, Notification, NotificationLevel, Notifier, Route};

/// Success messages go to stdout, errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("{}", notification.message),
            NotificationLevel::Error => eprintln!("Error: {}", notification.message),
        }
    }
}

/// A terminal cannot switch screens, so navigation prints the next step.
#[derive(Debug, Clone)]
pub struct ConsoleNavigator {
    profile_name: String,
    quiet: bool,
}

impl ConsoleNavigator {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            quiet: false,
        }
    }

    /// For a sign-out the user asked for; there is no next step to print.
    pub fn quiet(profile_name: impl Into<String>) -> Self {
        Self {
            quiet: true,
            ..Self::new(profile_name)
        }
    }

    pub fn hint(&self, route: Route) -> Option<String> {
        (!self.quiet).then(|| route_hint(route, &self.profile_name))
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        if let Some(hint) = self.hint(route) {
            eprintln!("{hint}");
        }
    }
}

pub fn route_hint(route: Route, profile_name: &str) -> String {
    match route {
        Route::Login => format!(
            "Sign in again with `taskdeck --profile {profile_name} auth login --email <email> --password <password>`."
        ),
    }
}
