use crate::types::UserCode;

/// Request to set or change one of the two card secrets. Which one is
/// determined by the wrapping command.
#[derive(Debug, Clone)]
pub struct SetUserCodeRequest {
    /// The new code value
    pub code: UserCode,
}
