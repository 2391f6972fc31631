/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 14/09/2026
License: MIT
*/

pub mod algorithms;
pub mod configs;
pub mod error;
pub mod projection;
pub mod structures;
pub mod utils;

pub use crate::error::{Error, Result};
