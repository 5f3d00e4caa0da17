//! Core data types shared by layouts and views.
//!
//! `primitive` holds the fixed table of C primitive types for the 32-bit
//! little-endian target; `value` holds the dynamic `Value` read from and
//! written to views.

pub mod primitive;
pub mod value;
