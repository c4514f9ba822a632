mod color;
mod frame;
mod result;

pub use color::ColorChannel;
pub use frame::{Frame, ScanRegion};
pub use result::{DecodedResult, ExtractionMethod, ResultOrigin};
