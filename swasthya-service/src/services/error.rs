use service_core::error::AppError;

use crate::services::directory::DirectoryError;
use crate::services::family::FamilyError;

impl From<FamilyError> for AppError {
    fn from(err: FamilyError) -> Self {
        let message = err.to_string();
        match err {
            FamilyError::MissingField(_)
            | FamilyError::MissingTarget
            | FamilyError::SelfRequest
            | FamilyError::NotPending(_) => AppError::bad_request(message),
            FamilyError::DuplicatePending | FamilyError::AlreadyConnected => {
                AppError::conflict(message)
            }
            FamilyError::NotFound => AppError::not_found(message),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::MissingQuery => AppError::bad_request(err.to_string()),
        }
    }
}
