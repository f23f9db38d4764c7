// argus_core/src/lib.rs

// This file defines the public modules of the library.
pub mod error;
pub mod geometry;
pub mod index;
pub mod objects;
pub mod perception;
pub mod prelude;
pub mod spatial;
