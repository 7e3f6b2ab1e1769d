pub mod orders;
pub mod passcode_challenges;
pub mod site_settings;
