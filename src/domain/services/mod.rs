mod offset_sampler;
mod residential_validator;

pub use offset_sampler::{OffsetSampler, DEGREES_PER_KM};
pub use residential_validator::ResidentialValidator;
