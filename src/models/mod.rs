// src/models/mod.rs
pub mod gbm;
pub mod model;
pub mod ou_process;

pub use gbm::Gbm;
pub use model::SDEModel;
pub use ou_process::OuProcess;
