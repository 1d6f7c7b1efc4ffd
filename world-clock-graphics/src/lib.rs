use std::sync::Arc;

use chrono_tz::Tz;
use embedded_graphics::{pixelcolor::Rgb565, prelude::DrawTarget};

pub mod color;
pub mod error;
pub mod face;
pub mod geometry;
pub mod model;
pub mod state;
pub mod style;
pub mod tick;
pub mod wall_time;

pub use error::{ClockError, ClockResult};
pub use face::FaceLayout;
pub use geometry::Position;
pub use model::{parse_timezone, ClockFaceModel, Hand, HandEndpoints, HandKind, Hands};
pub use state::ClockState;
pub use style::{ClockStyle, HandStyle};
pub use tick::{SystemTickSource, TickSource};
pub use wall_time::{HandAngles, WallTime};

pub struct Interface {
    state: Arc<ClockState>,
    style: ClockStyle,
    drawn_revision: Option<u32>,
    drawn_timezone: Option<Tz>,
}

impl Interface {
    pub fn new(state: Arc<ClockState>) -> Self {
        Self {
            state,
            style: ClockStyle::default(),
            drawn_revision: None,
            drawn_timezone: None,
        }
    }

    pub fn with_style(mut self, style: ClockStyle) -> Self {
        self.style = style;
        self.drawn_revision = None;
        self
    }

    pub fn state(&self) -> &Arc<ClockState> {
        &self.state
    }

    pub fn invalidate(&mut self) {
        self.drawn_revision = None;
    }

    /// Redraws the face if the time or zone changed since the last call.
    /// Returns whether anything was drawn.
    pub fn render<D>(&mut self, target: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let revision = self.state.revision();
        if self.drawn_revision == Some(revision) {
            return Ok(false);
        }
        let (timezone, time) = self.state.view();
        // the label may stick out of the dial
        if self.drawn_revision.is_none() || self.drawn_timezone != timezone {
            target.clear(self.style.background)?;
        }

        let layout = FaceLayout::fit(target.bounding_box(), self.style.margin);
        face::draw_dial(target, &layout, &self.style, timezone.map(|tz| tz.name()))?;
        if let Some(time) = time {
            face::draw_hands(target, &layout, &self.style, time)?;
        }

        self.drawn_revision = Some(revision);
        self.drawn_timezone = timezone;
        Ok(true)
    }
}
