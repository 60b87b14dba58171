pub mod config;
pub mod errors;
pub mod http;
pub mod models;

pub use config::AppConfig;
pub use errors::FarmError;
pub use models::{
    Language,
    Prescription,
    PrescriptionStatus,
};
