//! Local logic of the farmguard livestock dashboard: prescription OCR field
//! extraction, multilingual speech preparation, the farm-assistant chat proxy,
//! and typed access to the hosted database and its realtime alert feed.

pub mod chat;
pub mod core;
pub mod database;
pub mod i18n;
pub mod ocr;
pub mod persistence;
pub mod realtime;
pub mod speech;

pub use crate::core::{
    AppConfig,
    FarmError,
    Language,
    Prescription,
    PrescriptionStatus,
};
