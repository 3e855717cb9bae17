use thiserror::Error;

/// Failures of the reminders store contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("full access to reminders has not been granted")]
    AccessDenied,

    #[error("the permission request failed: {0}")]
    RequestAccessFailed(String),

    #[error("no default list is configured")]
    NoDefaultList,

    #[error("list '{0}' was not found")]
    ListNotFound(String),

    /// More than one list reported the same identifier.
    #[error("list id '{0}' is not unique")]
    DuplicateListId(String),

    #[error("saving the reminder failed: {0}")]
    CreateFailed(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
