pub mod client;
pub mod entities;

pub use client::{
    DashboardSummary,
    DatabaseClient,
};
pub use entities::{
    Alert,
    AlertType,
    AmuEntry,
    Animal,
    Antimicrobial,
    Contaminant,
    ContaminantType,
    FoodCategory,
    FoodSafetySample,
    PrescriptionRow,
    Profile,
    Record,
    Species,
    TestResult,
    TestStatus,
};
