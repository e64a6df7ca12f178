//! Ground tracks: geodetic sub-satellite points split at the antimeridian
//!
//! Every trajectory sample is rotated into the Earth-fixed frame at its own
//! instant, reduced to geodetic latitude/longitude and wrapped into
//! [-180, 180). The resulting sequence is cut wherever two consecutive
//! longitudes differ by more than 180 degrees, so that no drawn line
//! crosses the map seam.

mod sampling;

pub use sampling::{recommended_sample_count, steps_per_day};

use crate::coordinates::GeodeticPoint;
use crate::earthlib::ecef_to_geodetic;
use crate::framelib::eci_to_ecef;
use crate::propagation::{PropagationWindow, StateVector, Trajectory, TrajectorySample};
use crate::time::JulianDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Longitude-continuous run of ground-track points, as parallel arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTrackSegment {
    /// Index of the first point within the whole track
    pub start_index: usize,
    /// Geodetic latitudes in degrees
    pub latitudes: Vec<f64>,
    /// Longitudes in degrees, within [-180, 180)
    pub longitudes: Vec<f64>,
}

impl GroundTrackSegment {
    fn from_points(start_index: usize, points: &[GeodeticPoint]) -> Self {
        Self {
            start_index,
            latitudes: points.iter().map(|p| p.latitude_deg).collect(),
            longitudes: points.iter().map(|p| p.longitude_deg).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.latitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitudes.is_empty()
    }

    /// Index one past the last point within the whole track
    pub fn end_index(&self) -> usize {
        self.start_index + self.len()
    }

    /// Points of this segment in order
    pub fn points(&self) -> impl Iterator<Item = GeodeticPoint> + '_ {
        self.latitudes
            .iter()
            .zip(&self.longitudes)
            .map(|(&lat, &lon)| GeodeticPoint::new(lat, lon))
    }
}

/// A full ground track: consecutive segments covering every sample once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundTrack {
    segments: Vec<GroundTrackSegment>,
}

impl GroundTrack {
    pub fn segments(&self) -> &[GroundTrackSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<GroundTrackSegment> {
        self.segments
    }

    /// Number of points over all segments
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(GroundTrackSegment::len).sum()
    }

    /// All points in track order
    pub fn points(&self) -> impl Iterator<Item = GeodeticPoint> + '_ {
        self.segments.iter().flat_map(GroundTrackSegment::points)
    }
}

/// Split a longitude sequence wherever consecutive points jump by more than 180 degrees
///
/// The jump index opens the new segment; the last segment always ends with
/// the last point. Empty input gives no segments.
pub fn split_at_antimeridian(points: &[GeodeticPoint]) -> Vec<GroundTrackSegment> {
    let mut segments = Vec::new();
    if points.is_empty() {
        return segments;
    }

    let mut start = 0;
    for i in 1..points.len() {
        if (points[i].longitude_deg - points[i - 1].longitude_deg).abs() > 180.0 {
            segments.push(GroundTrackSegment::from_points(start, &points[start..i]));
            start = i;
        }
    }
    segments.push(GroundTrackSegment::from_points(start, &points[start..]));
    segments
}

/// Turns propagated ECI samples into a segmented ground track
#[derive(Debug, Clone, Copy)]
pub struct GroundTrackBuilder {
    epoch: JulianDate,
}

impl GroundTrackBuilder {
    /// Builder for samples whose elapsed times are counted from `epoch`
    pub fn new(epoch: JulianDate) -> Self {
        Self { epoch }
    }

    pub fn epoch(&self) -> JulianDate {
        self.epoch
    }

    /// Sub-satellite point of a state at `elapsed_s` seconds after the epoch
    pub fn geodetic_point(&self, state: &StateVector, elapsed_s: f64) -> GeodeticPoint {
        let jd = self.epoch.add_seconds(elapsed_s);
        ecef_to_geodetic(&eci_to_ecef(&state.position, jd)).wrapped()
    }

    /// Geodetic points of each sample, in order
    pub fn geodetic_points(&self, samples: &[TrajectorySample]) -> Vec<GeodeticPoint> {
        samples
            .iter()
            .map(|s| self.geodetic_point(&s.state, s.elapsed_s))
            .collect()
    }

    /// Segmented ground track of time-ordered samples
    pub fn build(&self, samples: &[TrajectorySample]) -> GroundTrack {
        let segments = split_at_antimeridian(&self.geodetic_points(samples));
        debug!(
            "ground track from {} samples: {} segments",
            samples.len(),
            segments.len()
        );
        GroundTrack { segments }
    }

    /// Segmented ground track of a whole trajectory
    pub fn build_trajectory(&self, trajectory: &Trajectory) -> GroundTrack {
        self.build(trajectory.samples())
    }
}

/// Everything a renderer needs to draw one ground-track request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTrackReport {
    /// Span the track covers
    pub window: PropagationWindow,
    /// Sub-satellite point at the reference time
    pub reference_point: GeodeticPoint,
    /// Track segments, in time order
    pub track: GroundTrack,
    /// Number of samples over all segments
    pub sample_count: usize,
}
