//! Business logic services

pub mod shift_validation;
