//! Business logic services for the Retail Stock & Sales Accounting Platform

pub mod batch;
pub mod product;
pub mod report;
pub mod sale;

pub use batch::BatchService;
pub use product::ProductService;
pub use report::ReportService;
pub use sale::SaleService;
