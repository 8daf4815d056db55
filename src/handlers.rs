pub mod ai;
pub mod auth;
pub mod goals;
pub mod insurers;
pub mod leads;
pub mod reports;
pub mod sales;
pub mod stream;
pub mod users;
