/// Edge reported when an observed element crosses the viewport boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityEdge {
    Entered,
    Left,
}

/// Turns raw intersection reports into one event per transition.
///
/// Starts hidden and disarmed; reports are ignored until [`VisibilityWatcher::arm`]
/// is called (once the plane's texture exists).
#[derive(Clone, Debug, Default)]
pub struct VisibilityWatcher {
    armed: bool,
    visible: bool,
}

impl VisibilityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn report(&mut self, intersecting: bool) -> Option<VisibilityEdge> {
        if !self.armed || intersecting == self.visible {
            return None;
        }
        self.visible = intersecting;
        Some(if intersecting {
            VisibilityEdge::Entered
        } else {
            VisibilityEdge::Left
        })
    }
}
