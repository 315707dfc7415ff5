pub mod models;
pub mod services;
pub mod store;

pub use models::*;
pub use services::PatientService;
pub use store::{InMemoryPatientStore, PatientStore};
