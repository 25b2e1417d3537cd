pub mod control_variate;
pub mod governor;
pub mod mc_engine;
pub mod path;
