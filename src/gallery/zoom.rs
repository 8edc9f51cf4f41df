use crate::config::ZoomConfig;

use super::frame::CropRect;

pub const ZOOM_ANNOUNCEMENT: &str =
    "Zoom activated. Use mouse wheel to zoom, drag to pan, or press Escape to exit.";

/// Scale and pan for the lightbox zoom viewer.
///
/// The pan is stored as the normalized centre of the visible region and is
/// clamped so the region never leaves the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    config: ZoomConfig,
    active: bool,
    scale: f32,
    center_x: f32,
    center_y: f32,
}

impl ZoomState {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            active: false,
            scale: 1.0,
            center_x: 0.5,
            center_y: 0.5,
        }
    }

    pub fn enter(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.scale = self.config.initial;
        self.center_x = 0.5;
        self.center_y = 0.5;
        true
    }

    pub fn exit(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.scale = 1.0;
        self.center_x = 0.5;
        self.center_y = 0.5;
        true
    }

    pub fn toggle(&mut self) {
        if !self.enter() {
            self.exit();
        }
    }

    pub fn reset(&mut self) {
        if self.active {
            self.scale = self.config.initial;
            self.center_x = 0.5;
            self.center_y = 0.5;
        }
    }

    pub fn wheel(&mut self, zoom_in: bool) -> bool {
        let step = self.config.wheel_step;
        self.adjust(if zoom_in { step } else { -step })
    }

    pub fn key_zoom(&mut self, zoom_in: bool) -> bool {
        let step = self.config.key_step;
        self.adjust(if zoom_in { step } else { -step })
    }

    /// Changes the scale while zoomed. Ignored outside zoom mode.
    fn adjust(&mut self, delta: f32) -> bool {
        if !self.active {
            return false;
        }
        let scale = (self.scale + delta).clamp(self.config.min, self.config.max);
        let changed = (scale - self.scale).abs() > f32::EPSILON;
        self.scale = scale;
        self.clamp_center();
        changed
    }

    /// Moves the visible region by a fraction of the image size.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if !self.active {
            return false;
        }
        let before = (self.center_x, self.center_y);
        self.center_x += dx;
        self.center_y += dy;
        self.clamp_center();
        before != (self.center_x, self.center_y)
    }

    pub fn pan_step(&mut self, dx_steps: i8, dy_steps: i8) -> bool {
        let step = self.config.pan_step;
        self.pan_by(f32::from(dx_steps) * step, f32::from(dy_steps) * step)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn crop_rect(&self) -> CropRect {
        if !self.active {
            return CropRect::FULL;
        }
        CropRect::around(self.scale, self.center_x, self.center_y)
    }

    fn clamp_center(&mut self) {
        let half = 0.5 / self.scale.max(1.0);
        self.center_x = self.center_x.clamp(half, 1.0 - half);
        self.center_y = self.center_y.clamp(half, 1.0 - half);
    }
}

#[cfg(test)]
mod tests {
    use super::ZoomState;
    use crate::config::ZoomConfig;
    use crate::gallery::frame::CropRect;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn enter_starts_at_initial_scale_and_exit_resets() {
        let mut zoom = ZoomState::new(ZoomConfig::default());
        assert!(!zoom.wheel(true));
        assert!(zoom.enter());
        assert!(approx(zoom.scale(), 1.5));
        assert!(zoom.pan_by(0.2, 0.0));

        assert!(zoom.exit());
        assert_eq!(zoom.scale(), 1.0);
        assert_eq!(zoom.center(), (0.5, 0.5));
        assert_eq!(zoom.crop_rect(), CropRect::FULL);
    }

    #[test]
    fn scale_is_clamped_to_configured_range() {
        let mut zoom = ZoomState::new(ZoomConfig::default());
        zoom.enter();
        for _ in 0..20 {
            zoom.key_zoom(true);
        }
        assert!(approx(zoom.scale(), 3.0));
        assert!(!zoom.key_zoom(true));

        for _ in 0..40 {
            zoom.wheel(false);
        }
        assert!(approx(zoom.scale(), 1.0));

        zoom.wheel(true);
        assert!(approx(zoom.scale(), 1.1));
        zoom.reset();
        assert!(approx(zoom.scale(), 1.5));
    }

    #[test]
    fn pan_stays_within_image_bounds() {
        let mut zoom = ZoomState::new(ZoomConfig::default());
        zoom.enter();
        for _ in 0..3 {
            zoom.key_zoom(true);
        }
        assert!(approx(zoom.scale(), 2.1));
        zoom.pan_by(-5.0, 5.0);
        let (x, y) = zoom.center();
        assert!(approx(x, 0.5 / 2.1));
        assert!(approx(y, 1.0 - 0.5 / 2.1));
        assert!(!zoom.pan_by(-0.1, 0.1));

        let crop = zoom.crop_rect();
        assert_eq!(crop.x, 0);
        assert_eq!(u32::from(crop.y) + u32::from(crop.height), 1000);
    }

    #[test]
    fn zooming_out_pulls_pan_back_inside() {
        let mut zoom = ZoomState::new(ZoomConfig::default());
        zoom.enter();
        zoom.key_zoom(true);
        zoom.key_zoom(true);
        zoom.pan_step(10, 0);
        for _ in 0..10 {
            zoom.key_zoom(false);
        }
        assert_eq!(zoom.center().0, 0.5);
    }
}
