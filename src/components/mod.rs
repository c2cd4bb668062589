pub mod app;
pub mod plant_details;
pub mod plants;
