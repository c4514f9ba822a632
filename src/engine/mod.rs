mod controller;
mod loop_worker;

pub use controller::{ScannerBackends, ScannerEngine};
