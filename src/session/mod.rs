mod state;

pub use state::{ScanSession, ScanStatus};
