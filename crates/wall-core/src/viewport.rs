//! Viewport-dependent tuning: tessellation density and spread constants.

/// CSS width at or below which the layout is treated as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewportClass {
    #[default]
    Desktop,
    Mobile,
}

impl ViewportClass {
    pub fn from_css_width(width: f64) -> Self {
        if width <= MOBILE_BREAKPOINT_PX {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }
}

/// Everything that changes between desktop and mobile layouts.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportProfile {
    pub class: ViewportClass,
    /// Width and height segments of each rest sphere; points = (segments + 1)^2.
    pub sphere_segments: u32,
    /// Horizontal offset of each sphere when fully split.
    pub sphere_offset_x: f32,
    pub plane_segments: u32,
    pub plane_height: f32,
    pub plane_spread: f32,
    pub plane_pulse_amplitude: f32,
    pub max_planes: Option<usize>,
    pub camera_z: f32,
    pub fovy_degrees: f32,
}

impl ViewportProfile {
    pub fn for_class(class: ViewportClass) -> Self {
        match class {
            ViewportClass::Desktop => Self {
                class,
                sphere_segments: 300,
                sphere_offset_x: 5.5,
                plane_segments: 90,
                plane_height: 3.2,
                plane_spread: 4.7,
                plane_pulse_amplitude: 0.08,
                max_planes: None,
                camera_z: 8.0,
                fovy_degrees: 55.0,
            },
            ViewportClass::Mobile => Self {
                class,
                sphere_segments: 180,
                sphere_offset_x: 2.2,
                plane_segments: 50,
                plane_height: 2.4,
                plane_spread: 3.2,
                plane_pulse_amplitude: 0.05,
                max_planes: Some(2),
                camera_z: 10.5,
                fovy_degrees: 65.0,
            },
        }
    }

    /// Override the sphere tessellation, keeping everything else.
    pub fn with_sphere_segments(mut self, segments: u32) -> Self {
        self.sphere_segments = segments.max(3);
        self
    }

    #[inline]
    pub fn sphere_point_count(&self) -> usize {
        let n = self.sphere_segments as usize + 1;
        n * n
    }
}

impl Default for ViewportProfile {
    fn default() -> Self {
        Self::for_class(ViewportClass::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_splits_classes() {
        assert_eq!(ViewportClass::from_css_width(375.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_css_width(768.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_css_width(1280.0), ViewportClass::Desktop);
    }

    #[test]
    fn mobile_is_lighter_than_desktop() {
        let d = ViewportProfile::for_class(ViewportClass::Desktop);
        let m = ViewportProfile::for_class(ViewportClass::Mobile);
        assert!(m.sphere_point_count() < d.sphere_point_count());
        assert!(m.plane_segments < d.plane_segments);
        assert!(m.sphere_offset_x < d.sphere_offset_x);
        assert_eq!(m.max_planes, Some(2));
    }

    #[test]
    fn tessellation_override_has_a_floor() {
        let p = ViewportProfile::default().with_sphere_segments(1);
        assert_eq!(p.sphere_segments, 3);
        assert_eq!(p.sphere_point_count(), 16);
    }
}
