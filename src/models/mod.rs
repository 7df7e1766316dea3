pub mod catalog;
pub mod difficulty;
pub mod evaluation;
pub mod model_profile;
pub mod session;
pub mod stage;
