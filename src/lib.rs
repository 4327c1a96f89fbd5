//! Barwave library - signal-to-geometry pipeline for a 3-D spectrum bar grid

pub mod animation;
pub mod bands;
pub mod geometry;
pub mod params;
pub mod rendering;
pub mod source;
pub mod spectrum;
pub mod viz;
