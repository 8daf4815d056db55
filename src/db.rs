pub mod user_repo;
pub use user_repo::UserRepository;
pub mod sales_repo;
pub use sales_repo::SaleRepository;
pub mod leads_repo;
pub use leads_repo::LeadRepository;
pub mod goals_repo;
pub use goals_repo::GoalRepository;
pub mod insurers_repo;
pub use insurers_repo::InsurerRepository;
