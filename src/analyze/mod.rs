pub mod fingerprint;

pub use fingerprint::{FingerprintReport, TechDetector, TechnologyFingerprint};
