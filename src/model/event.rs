use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Closed set of things the simulation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    TribeFormed,
    TribeSplit,
    CivilizationFormed,
    LeaderDied,
    WarDeclared,
    WarEnded,
    TerritoryConquered,
    AllianceFormed,
    CityFounded,
    PandemicStarted,
    DisasterOccurred,
    TechAdvancement,
    Settlement,
    Disaster,
    Extinction,
    Conquest,
    Collapse,
    TensionRising,
    IdeologicalShift,
}

impl EventKind {
    /// Surface events show up in the UI feed; latent events only exist in
    /// the historical stream. Per-tile war gains and tribal absorptions
    /// are too chatty for the feed.
    pub fn is_surface(self) -> bool {
        !matches!(self, EventKind::TerritoryConquered | EventKind::Conquest)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub year: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
    /// Tile coordinates the event happened at, when it has a place; the
    /// renderer uses this to pan the camera.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<(u32, u32)>,
}

impl Event {
    pub fn new(year: u32, kind: EventKind, message: String) -> Self {
        Self {
            year,
            kind,
            message,
            location: None,
        }
    }

    pub fn located(year: u32, kind: EventKind, message: String, x: u32, y: u32) -> Self {
        Self {
            year,
            kind,
            message,
            location: Some((x, y)),
        }
    }
}

/// Append-only event stream.
///
/// Every event lands in the latent history; surface-kind events are also
/// referenced by a bounded ring of the most recent entries for the UI.
/// Subscribers read the latent stream forward from a cursor they keep.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    latent: Vec<Event>,
    surface: VecDeque<usize>,
}

impl EventLog {
    pub const SURFACE_CAP: usize = 200;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        if event.kind.is_surface() {
            if self.surface.len() == Self::SURFACE_CAP {
                self.surface.pop_front();
            }
            self.surface.push_back(self.latent.len());
        }
        self.latent.push(event);
    }

    /// Most recent surface events, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &Event> {
        self.surface.iter().map(|&i| &self.latent[i])
    }

    /// Read the latent stream forward from `cursor`; returns the new
    /// events and the cursor to resume from.
    pub fn read_from(&self, cursor: usize) -> (&[Event], usize) {
        let start = cursor.min(self.latent.len());
        (&self.latent[start..], self.latent.len())
    }

    pub fn len(&self) -> usize {
        self.latent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latent.is_empty()
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.latent.iter().filter(|e| e.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.latent.iter()
    }
}
