use crate::geometry::{DecodeMode, Located};
use crate::error::Result;
use crate::message;
use crate::poi::{PointOfInterest, PointOfInterestSource, PropertyMapper};

/// Read-only list of points of interest, built fresh from a source.
#[derive(Debug, Clone, Default)]
pub struct PointOfInterestStore {
    points: Vec<PointOfInterest>,
}

impl PointOfInterestStore {
    pub fn new(points: Vec<PointOfInterest>) -> PointOfInterestStore {
        PointOfInterestStore { points }
    }

    /// Fetches every record from `source`. In strict mode the first record
    /// with an invalid geometry fails the whole load.
    pub fn load<S: PointOfInterestSource + ?Sized>(
        source: &S,
        mapper: &PropertyMapper,
        mode: DecodeMode,
    ) -> Result<PointOfInterestStore> {
        let records = source.fetch()?;

        let mut points = Vec::with_capacity(records.len());
        for (i, rec) in records.into_iter().enumerate() {
            points.push(mapper.map_record(i, rec, mode)?);
        }

        let store = PointOfInterestStore::new(points);
        let missing = store.len() - store.num_located();
        if missing > 0 {
            message!("{} of {} points of interest have no usable geometry", missing, store.len());
        }
        Ok(store)
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_located(&self) -> usize {
        self.points.iter().filter(|p| p.location().is_some()).count()
    }
}
