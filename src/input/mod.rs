//! Input processing module
//! Handles format detection, byte decoding, and loading files from disk

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::DocumentFormat;
pub use manager::InputManager;
