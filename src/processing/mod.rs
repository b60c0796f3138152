pub mod derivation;
pub mod resolver;
pub mod smoothing;
pub mod statistics;
pub mod validate;
