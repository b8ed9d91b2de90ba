/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

pub mod algorithms;
pub mod configs;
pub mod spatial_ref_system;
pub mod structures;
pub mod utils;

use nalgebra as na;
