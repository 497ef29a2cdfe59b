pub mod generator;
pub mod sampler;

pub use generator::Generator;
pub use sampler::{Sampler, SamplerKind};
