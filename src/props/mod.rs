pub mod moist_air;
pub mod r410a;
