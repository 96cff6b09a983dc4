pub mod buffer;
pub mod constraints;
pub mod cursor;
pub mod field;
pub mod layout;
pub mod reflow;
pub mod text;

// Re-export key types for easier usage
pub use buffer::TextBuffer;
pub use constraints::*;
pub use cursor::LineCursor;
pub use field::*;
pub use layout::*;
pub use reflow::*;
