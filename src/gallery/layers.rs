use std::time::{Duration, Instant};

use super::frame::{CropRect, RgbaFrame};

const KEN_BURNS_PERIOD_MS: u128 = 24_000;
const KEN_BURNS_STEPS: u32 = 8;
const KEN_BURNS_MAX_ZOOM: f32 = 0.08;

#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub work: Option<usize>,
    pub frame: Option<RgbaFrame>,
    pub visible: bool,
    pub animated: bool,
    pub shown_at: Option<Instant>,
}

impl Layer {
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Slow zoom drift applied to the visible hero layer, quantized so the
    /// encoder only sees a handful of distinct crops per cycle.
    pub fn ken_burns_crop(&self, now: Instant) -> CropRect {
        let Some(shown_at) = self.shown_at.filter(|_| self.animated) else {
            return CropRect::FULL;
        };
        let phase = now.saturating_duration_since(shown_at).as_millis() % KEN_BURNS_PERIOD_MS;
        let half = KEN_BURNS_PERIOD_MS / 2;
        let rising = if phase < half { phase } else { KEN_BURNS_PERIOD_MS - phase };
        let step = ((rising * u128::from(KEN_BURNS_STEPS)) / half) as u32;
        let t = step as f32 / KEN_BURNS_STEPS as f32;
        CropRect::around(1.0 + KEN_BURNS_MAX_ZOOM * t, 0.5 + 0.02 * t, 0.5)
    }
}

/// Two ping-pong layers. At rest exactly one is visible; the other is staged
/// for the next navigation.
#[derive(Debug, Clone)]
pub struct CrossfadeLayers {
    layers: [Layer; 2],
    current: usize,
    fade_started: Option<Instant>,
    fade: Duration,
    ken_burns: bool,
}

impl CrossfadeLayers {
    pub fn new(fade: Duration, ken_burns: bool) -> Self {
        Self {
            layers: [Layer::default(), Layer::default()],
            current: 0,
            fade_started: None,
            fade,
            ken_burns,
        }
    }

    /// Targets the hidden layer at `work`.
    pub fn begin(&mut self, work: usize) {
        let hidden = &mut self.layers[1 - self.current];
        hidden.clear();
        hidden.work = Some(work);
    }

    pub fn staged_work(&self) -> Option<usize> {
        self.layers[1 - self.current].work
    }

    /// Shows the staged layer and hides the current one in a single step.
    pub fn reveal(&mut self, frame: RgbaFrame, now: Instant) {
        let incoming = 1 - self.current;
        let had_visible = self.layers[self.current].visible;
        {
            let outgoing = &mut self.layers[self.current];
            outgoing.visible = false;
            outgoing.animated = false;
        }
        let layer = &mut self.layers[incoming];
        layer.frame = Some(frame);
        layer.visible = true;
        layer.animated = self.ken_burns;
        layer.shown_at = Some(now);
        self.current = incoming;
        self.fade_started = had_visible.then_some(now);
    }

    /// Drops the staged layer after a failed load. The visible layer is untouched.
    pub fn abandon(&mut self) {
        self.layers[1 - self.current].clear();
    }

    pub fn visible(&self) -> &Layer {
        &self.layers[self.current]
    }

    /// The previous layer while the crossfade window is open.
    pub fn outgoing(&self, now: Instant) -> Option<&Layer> {
        self.fading(now)
            .then(|| &self.layers[1 - self.current])
            .filter(|layer| layer.frame.is_some())
    }

    pub fn fading(&self, now: Instant) -> bool {
        self.fade_started
            .is_some_and(|started| now.saturating_duration_since(started) < self.fade)
    }

    pub fn fade_progress(&self, now: Instant) -> f32 {
        match self.fade_started {
            Some(started) if !self.fade.is_zero() => {
                let elapsed = now.saturating_duration_since(started).as_secs_f32();
                (elapsed / self.fade.as_secs_f32()).min(1.0)
            }
            _ => 1.0,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.visible).count()
    }
}
