pub mod auth;
pub mod bulk;
pub mod dashboard_service;
pub mod filters;
pub mod goal_service;
pub mod insurer_service;
pub mod lead_service;
pub mod pitch;
pub mod realtime;
pub mod reports;
pub mod sale_service;
pub mod user_service;
