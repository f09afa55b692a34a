use crate::error::RecordError;
use crate::feed::CountryRecord;
use crate::marker::{Marker, MarkerFactory};

/// All markers attached to the rotating group, in feed order.
///
/// Markers only enter fully built; a record that fails validation or
/// construction leaves the registry untouched.
#[derive(Clone, Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    highlighted: Option<usize>,
}

/// Outcome of loading a feed into a registry.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub accepted: usize,
    pub rejected: Vec<RecordError>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, marker: Marker) -> usize {
        self.markers.push(marker);
        self.markers.len() - 1
    }

    /// Validate and build one feed record, adding it only on success.
    pub fn try_insert_record(
        &mut self,
        factory: &MarkerFactory,
        record: &CountryRecord,
        index: usize,
    ) -> Result<usize, RecordError> {
        let validated = record.validate(index)?;
        let marker = factory.build(&validated, index)?;
        Ok(self.insert(marker))
    }

    /// Build markers for every record, collecting rejections instead of
    /// stopping at the first.
    pub fn extend_from_feed(
        &mut self,
        factory: &MarkerFactory,
        records: &[CountryRecord],
    ) -> BuildReport {
        let mut report = BuildReport::default();
        for (i, record) in records.iter().enumerate() {
            match self.try_insert_record(factory, record, i) {
                Ok(_) => report.accepted += 1,
                Err(e) => {
                    log::warn!("[registry] rejected {}", e);
                    report.rejected.push(e);
                }
            }
        }
        log::info!(
            "[registry] markers={} accepted={} rejected={}",
            self.markers.len(),
            report.accepted,
            report.rejected.len()
        );
        report
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Marker> {
        self.markers.iter_mut()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    /// Index of the marker brightened by the last `apply_highlight`.
    #[inline]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Dim every marker, then brighten `winner` if given.
    ///
    /// Runs in full every frame whether or not the winner changed.
    pub fn apply_highlight(&mut self, winner: Option<usize>) {
        for marker in &mut self.markers {
            marker.current_opacity = marker.base_opacity;
        }
        let winner = winner.filter(|&i| i < self.markers.len());
        if let Some(m) = winner.and_then(|i| self.markers.get_mut(i)) {
            m.current_opacity = m.highlight_opacity;
        }
        if winner != self.highlighted {
            log::debug!("[highlight] {:?} -> {:?}", self.highlighted, winner);
        }
        self.highlighted = winner;
    }
}

impl<'a> IntoIterator for &'a MarkerRegistry {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
