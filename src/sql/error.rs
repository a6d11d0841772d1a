use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SqlError {
    #[error("No data")]
    NoData,
}
