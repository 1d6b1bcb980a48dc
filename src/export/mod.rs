pub mod opener;
pub mod pdf;
