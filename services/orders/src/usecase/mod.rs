pub mod admin;
pub mod lookup;
pub mod notify;
pub mod order;
pub mod passcode;
