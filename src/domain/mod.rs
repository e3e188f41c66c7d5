// Domain layer - transcoding types, error taxonomy and policy rules

pub mod errors;
pub mod model;
pub mod rules;
