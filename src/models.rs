pub mod ai;
pub mod auth;
pub mod bulk;
pub mod goals;
pub mod insurers;
pub mod leads;
pub mod pipeline;
pub mod reports;
pub mod sales;

/// Registros que pertencem a um vendedor (vendas e indicações).
pub trait SellerRecord {
    fn seller(&self) -> &str;
    fn client_name(&self) -> &str;
}
