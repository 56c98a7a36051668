pub mod subdomain;

pub use subdomain::{SubdomainHit, SubdomainProbe};
