//! Compiled zone polygons with an R-tree over their envelopes.

use geo::{BoundingRect, Polygon, Rect};
use hashbrown::{HashMap, HashSet};
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::{info, warn};

use super::geometry::{coord_from_lon_lat, polygon_from_ring};
use crate::models::RestrictedZone;

/// A registry zone whose boundary compiled into a valid polygon
#[derive(Debug)]
pub struct CompiledZone {
    /// Position in the registry; drives tie-breaking
    pub order: usize,
    pub zone: RestrictedZone,
    pub polygon: Polygon<f64>,
}

#[derive(Clone)]
struct IndexedZone {
    zone: Arc<CompiledZone>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedZone {
    fn new(zone: CompiledZone) -> Option<Self> {
        let rect = zone.polygon.bounding_rect()?;
        Some(Self {
            zone: Arc::new(zone),
            envelope: rect_envelope(rect),
        })
    }
}

fn rect_envelope(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// Spatial index over the active (successfully compiled) zones
pub struct ZoneIndex {
    tree: RTree<IndexedZone>,
    by_id: HashMap<String, Arc<CompiledZone>>,
}

impl ZoneIndex {
    /// Compile every registry zone. Zones that do not form a valid simple
    /// polygon, and repeated zone ids, are logged and left out.
    pub fn build(registry: &[RestrictedZone]) -> Self {
        let mut indexed = Vec::with_capacity(registry.len());
        let mut by_id = HashMap::new();
        let mut seen = HashSet::new();

        for (order, zone) in registry.iter().enumerate() {
            if !seen.insert(zone.zone_id.as_str()) {
                warn!(
                    "Duplicate zone id {}; keeping the first entry, skipping {}",
                    zone.zone_id, zone.zone_name
                );
                continue;
            }

            let polygon = match polygon_from_ring(zone.boundary.iter().copied().map(coord_from_lon_lat)) {
                Ok(polygon) => polygon,
                Err(reason) => {
                    warn!("Invalid polygon for zone {}: {}", zone.zone_name, reason);
                    continue;
                }
            };

            let compiled = CompiledZone {
                order,
                zone: zone.clone(),
                polygon,
            };
            if let Some(entry) = IndexedZone::new(compiled) {
                info!("Initialized polygon for zone: {}", zone.zone_name);
                by_id.insert(zone.zone_id.clone(), Arc::clone(&entry.zone));
                indexed.push(entry);
            }
        }

        let tree = RTree::bulk_load(indexed);
        info!("Zone index built with {} active zones", tree.size());

        Self { tree, by_id }
    }

    /// Active zones whose envelope touches `rect`, in registry order
    pub fn candidates(&self, rect: Rect<f64>) -> Vec<Arc<CompiledZone>> {
        let mut found: Vec<Arc<CompiledZone>> = self
            .tree
            .locate_in_envelope_intersecting(&rect_envelope(rect))
            .map(|iz| Arc::clone(&iz.zone))
            .collect();
        found.sort_by_key(|z| z.order);
        found
    }

    pub fn get(&self, zone_id: &str) -> Option<&Arc<CompiledZone>> {
        self.by_id.get(zone_id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
