use crate::chart::TelemetryChart;
use crate::map::{LayoutUpdate, MapSnapshot, MapSynchronizer, MarkerUpdate};
use crate::processing::{ChartSpec, ProcessedTelemetry, Row, TripSummary};
use serde::Serialize;
use uuid::Uuid;

/// Everything derived from one loaded file. Rebuilt from scratch on every load.
#[derive(Debug)]
pub struct VisualizationSession {
    pub id: Uuid,
    pub rows: Vec<Row>,
    pub summary: TripSummary,
    pub chart: TelemetryChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub rows: usize,
    pub summary: TripSummary,
    pub chart: ChartSpec,
    pub map: MapSnapshot,
}

/// Owns the current session and the long-lived map.
#[derive(Debug, Default)]
pub struct Controller {
    session: Option<VisualizationSession>,
    map: Option<MapSynchronizer>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session with a freshly processed file.
    pub fn load(&mut self, processed: ProcessedTelemetry) -> &VisualizationSession {
        if let Some(previous) = self.session.as_mut() {
            previous.chart.hover.detach_all();
        }
        if let Some(map) = self.map.as_mut() {
            map.detach();
        }

        let id = Uuid::new_v4();
        let ProcessedTelemetry {
            rows,
            summary,
            chart,
            track,
        } = processed;

        let mut chart = TelemetryChart::new(id, chart);
        let subscription = chart.hover.subscribe();

        let map = self.map.get_or_insert_with(|| {
            tracing::debug!("creating map");
            MapSynchronizer::new()
        });
        map.load_track(track, subscription);

        tracing::info!(session = %id, rows = rows.len(), "loaded telemetry session");

        self.session.insert(VisualizationSession {
            id,
            rows,
            summary,
            chart,
        })
    }

    pub fn session(&self) -> Option<&VisualizationSession> {
        self.session.as_ref()
    }

    /// Forward a chart hover to the map.
    ///
    /// `None` until a file has been loaded, or when the hover comes from the
    /// chart of a session that has since been replaced.
    pub fn hover(&mut self, session_id: Uuid, index: usize) -> Option<MarkerUpdate> {
        let session = self.session.as_mut()?;
        if session.id != session_id {
            tracing::warn!(stale = %session_id, current = %session.id, "ignoring hover from a replaced session");
            return None;
        }
        let map = self.map.as_mut()?;

        let delivered = session.chart.hover.emit(index);
        let moved = map.sync();
        tracing::debug!(index, delivered, moved, "chart hover");

        Some(map.marker_update(moved))
    }

    pub fn set_map_display(&mut self, enabled: bool) -> Option<LayoutUpdate> {
        self.session.as_ref()?;
        let map = self.map.as_mut()?;
        tracing::debug!(enabled, "map display toggled");
        Some(map.set_display_enabled(enabled))
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let session = self.session.as_ref()?;
        let map = self.map.as_ref()?;
        Some(SessionSnapshot {
            id: session.id,
            rows: session.rows.len(),
            summary: session.summary.clone(),
            chart: session.chart.spec.clone(),
            map: map.snapshot(),
        })
    }

    pub fn map(&self) -> Option<&MapSynchronizer> {
        self.map.as_ref()
    }
}
