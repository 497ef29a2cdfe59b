pub mod fft;
pub mod interp;
pub mod stats;
pub mod window;

pub use fft::FftHelper;
pub use stats::StatsHelper;
