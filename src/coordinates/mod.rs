pub mod geodetic;

pub use geodetic::{wrap_longitude, GeodeticPoint};
