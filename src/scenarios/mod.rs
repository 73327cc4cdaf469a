//! Ready-made battles.

pub mod training;

pub use training::TrainingScenario;
