pub mod company;
pub mod error;
pub mod job;
pub mod patch;
pub mod validate;

pub use company::{Company, CompanyDetail, CompanyField, CompanyFilter, CompanyJob, NewCompany};
pub use error::ModelError;
pub use job::{Job, JobField, JobFilter, NewJob};
