// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::{SchedulingError, SchedulingResult};

use crate::models::AppointmentStatus;

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<()> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !current_status.can_transition_to(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(SchedulingError::InvalidStatusTransition {
                from: current_status.to_string(),
                to: new_status.to_string(),
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        current_status.valid_transitions().to_vec()
    }

    pub fn is_terminal(&self, status: AppointmentStatus) -> bool {
        status.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_valid_transitions() {
        let lifecycle = AppointmentLifecycleService::new();

        assert_eq!(
            lifecycle.get_valid_transitions(AppointmentStatus::Reserved),
            vec![AppointmentStatus::Confirmed, AppointmentStatus::Canceled]
        );
        assert_eq!(
            lifecycle.get_valid_transitions(AppointmentStatus::Confirmed),
            vec![AppointmentStatus::Canceled]
        );
        assert!(lifecycle.get_valid_transitions(AppointmentStatus::Canceled).is_empty());
        assert!(lifecycle.is_terminal(AppointmentStatus::Canceled));
        assert!(!lifecycle.is_terminal(AppointmentStatus::Confirmed));
    }

    #[test]
    fn test_validate_status_transition() {
        let lifecycle = AppointmentLifecycleService::new();

        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Reserved, AppointmentStatus::Confirmed)
            .is_ok());
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Confirmed, AppointmentStatus::Canceled)
            .is_ok());
        assert_matches!(
            lifecycle.validate_status_transition(AppointmentStatus::Confirmed, AppointmentStatus::Reserved),
            Err(SchedulingError::InvalidStatusTransition { .. })
        );
        assert_matches!(
            lifecycle.validate_status_transition(AppointmentStatus::Canceled, AppointmentStatus::Confirmed),
            Err(SchedulingError::InvalidStatusTransition { .. })
        );
    }
}
