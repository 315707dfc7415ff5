pub mod availability;
pub mod doctor;
pub mod validation;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use validation::is_valid_nationality_code;
