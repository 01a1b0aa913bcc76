//! Shrink/flip/expand choreography between the base and extended pages.

use crate::page::{PageId, PageSet};
use crate::widget::Widget;

/// Global page transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// No transition in flight; labels are drawn.
    #[default]
    Idle,
    /// Keys of the current page are collapsing toward their centers.
    Shrinking,
    /// The page has flipped and its keys are growing back.
    Expanding,
}

/// Drives the two-phase page switch.
///
/// While shrinking, every key of the active page loses width at `rate`
/// units/second and drifts right at half that rate, so it collapses onto its
/// center. Once all of them reach zero width the active page flips and the
/// revealed page grows back the same way. Both pages are never visible at a
/// nonzero size in the same frame.
#[derive(Debug, Clone)]
pub struct PageTransition {
    state: TransitionState,
    active: PageId,
    rate: f64,
}

impl PageTransition {
    /// Create an idle controller showing `active`.
    pub fn new(active: PageId, rate: f64) -> Self {
        Self {
            state: TransitionState::Idle,
            active,
            rate,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// The page currently shown (and hit-tested).
    pub fn active_page(&self) -> PageId {
        self.active
    }

    pub fn is_busy(&self) -> bool {
        self.state != TransitionState::Idle
    }

    /// Labels are suppressed for the whole transition.
    pub fn labels_visible(&self) -> bool {
        !self.is_busy()
    }

    /// Start a transition. Ignored while one is already running.
    ///
    /// Returns whether a transition was started.
    pub fn trigger(&mut self) -> bool {
        if self.is_busy() {
            log::debug!("Page transition already running ({:?}), ignoring trigger", self.state);
            return false;
        }
        self.state = TransitionState::Shrinking;
        log::debug!("Page transition started from {} page", self.active.name());
        true
    }

    /// Step the animation by `dt` seconds. At most one phase change per call.
    pub fn advance(&mut self, pages: &mut PageSet, dt: f64) {
        if self.is_busy() {
            log::trace!("Page transition {:?} at {:.2}", self.state, self.progress(pages));
        }
        let delta = self.rate * dt.max(0.0);
        match self.state {
            TransitionState::Idle => {}
            TransitionState::Shrinking => {
                let page = pages.get_mut(self.active);
                for widget in page.iter_mut() {
                    let width = widget.size().width - delta;
                    widget.set_width(width);
                }
                if page.all_collapsed() {
                    self.active = self.active.flipped();
                    pages.get_mut(self.active).collapse_all();
                    self.state = TransitionState::Expanding;
                    log::debug!("Page flipped to {}, expanding", self.active.name());
                }
            }
            TransitionState::Expanding => {
                let page = pages.get_mut(self.active);
                for widget in page.iter_mut() {
                    let width = widget.size().width + delta;
                    widget.set_width(width);
                }
                if page.all_expanded() {
                    self.state = TransitionState::Idle;
                    log::debug!("Page transition finished on {} page", self.active.name());
                }
            }
        }
    }

    /// Completion of the current phase in `[0, 1]`, averaged over the active page.
    pub fn progress(&self, pages: &PageSet) -> f64 {
        let page = pages.get(self.active);
        if page.is_empty() {
            return if self.is_busy() { 1.0 } else { 0.0 };
        }
        let fill = page
            .iter()
            .map(width_fraction)
            .sum::<f64>()
            / page.len() as f64;
        match self.state {
            TransitionState::Idle => 0.0,
            TransitionState::Shrinking => 1.0 - fill,
            TransitionState::Expanding => fill,
        }
    }
}

fn width_fraction(widget: &Widget) -> f64 {
    let original = widget.original_size().width;
    if original <= 0.0 {
        1.0
    } else {
        (widget.size().width / original).clamp(0.0, 1.0)
    }
}
