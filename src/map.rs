use crate::chart::HoverSubscription;
use crate::processing::LatLng;
use serde::Serialize;

/// Delay before deferred layout work runs, so the container reaches its final size.
pub const RESIZE_SETTLE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Bounds {
                south_west: *first,
                north_east: *first,
            },
            |bounds, point| Bounds {
                south_west: LatLng::new(
                    bounds.south_west.lat.min(point.lat),
                    bounds.south_west.lon.min(point.lon),
                ),
                north_east: LatLng::new(
                    bounds.north_east.lat.max(point.lat),
                    bounds.north_east.lon.max(point.lon),
                ),
            },
        ))
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }
}

/// What the map viewport currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub fitted: Option<Bounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Chart and map side by side.
    Split,
    /// Chart only, full width.
    Full,
}

/// Work the page performs once the layout has settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeferredAction {
    InvalidateMapSize,
    FitBounds { bounds: Bounds },
    ResizeChart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutUpdate {
    pub display_enabled: bool,
    pub layout: Layout,
    pub delay_ms: u64,
    pub actions: Vec<DeferredAction>,
}

/// Marker position after a hover has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerUpdate {
    pub marker: LatLng,
    pub center: LatLng,
    pub moved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub track: Vec<LatLng>,
    pub bounds: Option<Bounds>,
    pub marker: LatLng,
    pub view: Viewport,
    pub display_enabled: bool,
}

/// Map track, marker and viewport kept in step with chart hovers.
///
/// Created once and reused for every loaded file.
#[derive(Debug, Default)]
pub struct MapSynchronizer {
    track: Vec<LatLng>,
    bounds: Option<Bounds>,
    marker: LatLng,
    view: Viewport,
    display_enabled: bool,
    subscription: Option<HoverSubscription>,
}

impl MapSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop listening to the current chart.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Replace the track for a new session and listen to its chart.
    pub fn load_track(&mut self, track: Vec<LatLng>, subscription: HoverSubscription) {
        self.detach();

        self.bounds = Bounds::from_points(&track);
        self.track = track;
        self.fit_to_track();

        if let Some(start) = self.track.first().copied() {
            self.marker = start;
            self.view.center = start;
        }

        self.subscription = Some(subscription);
    }

    /// Apply every pending hover event from the attached chart.
    pub fn sync(&mut self) -> bool {
        let mut moved = false;
        while let Some(event) = self
            .subscription
            .as_mut()
            .and_then(HoverSubscription::try_next)
        {
            moved |= self.move_marker_to(event.index);
        }
        moved
    }

    fn move_marker_to(&mut self, index: usize) -> bool {
        if !self.display_enabled {
            return false;
        }
        match self.track.get(index).copied() {
            Some(position) => {
                self.marker = position;
                self.view.center = position;
                true
            }
            None => {
                tracing::warn!(index, len = self.track.len(), "hover index outside track");
                false
            }
        }
    }

    pub fn set_display_enabled(&mut self, enabled: bool) -> LayoutUpdate {
        self.display_enabled = enabled;

        if enabled {
            self.fit_to_track();
            let mut actions = vec![DeferredAction::InvalidateMapSize];
            if let Some(bounds) = self.bounds {
                actions.push(DeferredAction::FitBounds { bounds });
            }
            actions.push(DeferredAction::ResizeChart);
            LayoutUpdate {
                display_enabled: true,
                layout: Layout::Split,
                delay_ms: RESIZE_SETTLE_DELAY_MS,
                actions,
            }
        } else {
            LayoutUpdate {
                display_enabled: false,
                layout: Layout::Full,
                delay_ms: RESIZE_SETTLE_DELAY_MS,
                actions: vec![DeferredAction::ResizeChart],
            }
        }
    }

    fn fit_to_track(&mut self) {
        self.view.fitted = self.bounds;
        if let Some(bounds) = self.bounds {
            self.view.center = bounds.center();
        }
    }

    pub fn marker_update(&self, moved: bool) -> MarkerUpdate {
        MarkerUpdate {
            marker: self.marker,
            center: self.view.center,
            moved,
        }
    }

    pub fn marker(&self) -> LatLng {
        self.marker
    }

    pub fn display_enabled(&self) -> bool {
        self.display_enabled
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            track: self.track.clone(),
            bounds: self.bounds,
            marker: self.marker,
            view: self.view,
            display_enabled: self.display_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::HoverEmitter;
    use uuid::Uuid;

    fn diagonal() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(2.0, 2.0),
        ]
    }

    fn loaded() -> (MapSynchronizer, HoverEmitter) {
        let mut emitter = HoverEmitter::new(Uuid::new_v4());
        let mut map = MapSynchronizer::new();
        map.load_track(diagonal(), emitter.subscribe());
        (map, emitter)
    }

    #[test]
    fn load_places_marker_at_start_and_fits_bounds() {
        let (map, _emitter) = loaded();
        let snapshot = map.snapshot();

        assert_eq!(snapshot.marker, LatLng::new(0.0, 0.0));
        assert_eq!(snapshot.view.center, LatLng::new(0.0, 0.0));
        assert_eq!(
            snapshot.view.fitted,
            Some(Bounds {
                south_west: LatLng::new(0.0, 0.0),
                north_east: LatLng::new(2.0, 2.0),
            })
        );
    }

    #[test]
    fn hover_moves_marker_only_when_displayed() {
        let (mut map, mut emitter) = loaded();

        emitter.emit(1);
        assert!(!map.sync());
        assert_eq!(map.marker(), LatLng::new(0.0, 0.0));

        map.set_display_enabled(true);
        emitter.emit(1);
        assert!(map.sync());
        assert_eq!(map.marker(), LatLng::new(1.0, 1.0));
        assert_eq!(map.snapshot().view.center, LatLng::new(1.0, 1.0));
    }

    #[test]
    fn out_of_range_hover_is_ignored() {
        let (mut map, mut emitter) = loaded();
        map.set_display_enabled(true);

        emitter.emit(10);

        assert!(!map.sync());
        assert_eq!(map.marker(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn enabling_display_splits_layout_and_refits() {
        let (mut map, _emitter) = loaded();

        let update = map.set_display_enabled(true);

        assert_eq!(update.layout, Layout::Split);
        assert_eq!(update.delay_ms, RESIZE_SETTLE_DELAY_MS);
        assert_eq!(update.actions.first(), Some(&DeferredAction::InvalidateMapSize));
        assert_eq!(update.actions.last(), Some(&DeferredAction::ResizeChart));
        assert!(
            update
                .actions
                .iter()
                .any(|action| matches!(action, DeferredAction::FitBounds { .. }))
        );
        assert_eq!(map.snapshot().view.center, LatLng::new(1.0, 1.0));
    }

    #[test]
    fn disabling_display_only_resizes_chart() {
        let (mut map, _emitter) = loaded();
        map.set_display_enabled(true);

        let update = map.set_display_enabled(false);

        assert_eq!(update.layout, Layout::Full);
        assert_eq!(update.actions, vec![DeferredAction::ResizeChart]);
        assert!(!map.display_enabled());
    }

    #[test]
    fn reload_drops_previous_subscription() {
        let (mut map, mut old_emitter) = loaded();
        map.set_display_enabled(true);

        let mut new_emitter = HoverEmitter::new(Uuid::new_v4());
        map.load_track(
            vec![LatLng::new(5.0, 5.0), LatLng::new(6.0, 6.0)],
            new_emitter.subscribe(),
        );

        assert_eq!(old_emitter.emit(1), 0);
        assert!(!map.sync());
        assert_eq!(map.marker(), LatLng::new(5.0, 5.0));

        new_emitter.emit(1);
        assert!(map.sync());
        assert_eq!(map.marker(), LatLng::new(6.0, 6.0));
    }
}
