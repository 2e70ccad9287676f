pub mod image_io;
pub mod ser;
pub mod source;

pub use source::open_source;
