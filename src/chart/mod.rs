pub mod models;

pub use models::*;

use crate::error::AnalysisError;

impl AnalyzeRequest {
    /// Promote the request into a `Subject`, rejecting a missing location.
    pub fn into_subject(self) -> Result<Subject, AnalysisError> {
        let selected_location = self
            .selected_location
            .ok_or_else(|| AnalysisError::Validation("Location not selected".to_string()))?;

        Ok(Subject {
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            time_of_birth: self.time_of_birth,
            place_of_birth: self.place_of_birth,
            selected_location,
        })
    }
}
