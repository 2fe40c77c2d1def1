//! Read-only snapshot handed to renderers.

use crate::annotation::{AnnotationStore, GuideLine, PointMarker};
use crate::geometry::{Frame, ViewportSize};

/// Everything a paint pass needs, borrowed immutably for the duration of one draw.
#[derive(Debug, Clone, Copy)]
pub struct OverlayScene<'a> {
    pub viewport: ViewportSize,
    pub frame: &'a Frame,
    pub store: &'a AnnotationStore,
}

impl<'a> OverlayScene<'a> {
    pub fn new(viewport: ViewportSize, frame: &'a Frame, store: &'a AnnotationStore) -> Self {
        Self {
            viewport,
            frame,
            store,
        }
    }

    pub fn dots(&self) -> &'a [PointMarker] {
        self.store.dots()
    }

    pub fn lines(&self) -> &'a [GuideLine] {
        self.store.lines()
    }

    pub fn selected(&self) -> Option<usize> {
        self.store.selected()
    }
}
