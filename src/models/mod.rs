pub mod model;
pub mod vasicek;
