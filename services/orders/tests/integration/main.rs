
mod contract_test;
mod lookup_test;
mod notify_test;
mod passcode_test;
