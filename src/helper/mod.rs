pub mod background;
pub mod error;
pub mod filters;
pub mod io;
pub mod marker;
pub mod report;
pub mod scan;
pub mod segment;

pub use error::XoError;
