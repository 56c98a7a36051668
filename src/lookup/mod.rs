pub mod geo;
pub mod whois;

pub use geo::{GeoLocation, GeoLocator};
pub use whois::{WhoisClient, WhoisRecord};
