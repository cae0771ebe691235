//! Navigation modes and the per-mode shape target table.

use crate::constants::{
    RELIEF_MESH_RADIUS, RELIEF_TILT_X, WAVE_LINE_MESH_RADIUS, WAVE_LINE_TILT_X,
};
use crate::error::WallError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Home,
    About,
    Works,
    Contacts,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Home, Mode::About, Mode::Works, Mode::Contacts];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Accepts the bare name or a `nav-` prefixed element id.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.strip_prefix("nav-").unwrap_or(name) {
            "home" => Some(Mode::Home),
            "about" => Some(Mode::About),
            "works" => Some(Mode::Works),
            "contacts" | "contact" => Some(Mode::Contacts),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = WallError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mode::ALL
            .get(value as usize)
            .copied()
            .ok_or(WallError::UnknownMode(value))
    }
}

/// Target values the smoothed shape state converges to in a given mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeTarget {
    pub freq_r: f32,
    pub freq_a: f32,
    pub amplitude: f32,
    pub scale: f32,
}

impl ShapeTarget {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.freq_r.is_finite()
            && self.freq_a.is_finite()
            && self.amplitude.is_finite()
            && self.scale.is_finite()
    }
}

// (freq_r, freq_a, amplitude) per mode, shared by both styles
const WAVE_PARAMS: [(f32, f32, f32); 4] = [
    (1.0, 3.0, 0.2),   // home
    (0.2, 6.0, 0.4),   // about
    (3.0, 1.0, 0.35),  // works
    (20.0, 1.0, 0.9),  // contacts
];
const WAVE_LINE_SCALES: [f32; 4] = [1.5, 1.0, 8.0, 4.0];
const IMAGE_RELIEF_SCALES: [f32; 4] = [1.5, 1.3, 6.0, 0.7];

/// Which secondary shape the spheres morph into while in [`Mode::Contacts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MorphStyle {
    /// Both spheres collapse into a stereo wave line.
    WaveLine,
    /// Both spheres flatten into a relief sampled from a photograph.
    #[default]
    ImageRelief,
}

impl MorphStyle {
    /// Total lookup of the shape target for `mode`.
    pub fn shape_target(self, mode: Mode) -> ShapeTarget {
        let (freq_r, freq_a, amplitude) = WAVE_PARAMS[mode.index()];
        let scale = match self {
            MorphStyle::WaveLine => WAVE_LINE_SCALES[mode.index()],
            MorphStyle::ImageRelief => IMAGE_RELIEF_SCALES[mode.index()],
        };
        ShapeTarget {
            freq_r,
            freq_a,
            amplitude,
            scale,
        }
    }

    /// Radius of the rest sphere the points are sampled from.
    ///
    /// The radial wave term reads the rest radius directly, so the two styles
    /// keep their own value instead of sharing one.
    pub fn mesh_radius(self) -> f32 {
        match self {
            MorphStyle::WaveLine => WAVE_LINE_MESH_RADIUS,
            MorphStyle::ImageRelief => RELIEF_MESH_RADIUS,
        }
    }

    pub fn rest_tilt(self) -> f32 {
        match self {
            MorphStyle::WaveLine => WAVE_LINE_TILT_X,
            MorphStyle::ImageRelief => RELIEF_TILT_X,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wave" | "wave-line" => Some(MorphStyle::WaveLine),
            "relief" | "image-relief" => Some(MorphStyle::ImageRelief),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_ids_map_to_modes() {
        assert_eq!(Mode::from_name("nav-works"), Some(Mode::Works));
        assert_eq!(Mode::from_name("contacts"), Some(Mode::Contacts));
        assert_eq!(Mode::from_name("nav-blog"), None);
    }

    #[test]
    fn mode_from_index_round_trips_the_four_modes() {
        for (i, m) in Mode::ALL.iter().enumerate() {
            assert_eq!(Mode::try_from(i as u8).unwrap(), *m);
            assert_eq!(m.index(), i);
        }
        assert!(matches!(Mode::try_from(4), Err(WallError::UnknownMode(4))));
    }

    #[test]
    fn home_target_matches_both_styles() {
        let a = MorphStyle::WaveLine.shape_target(Mode::Home);
        let b = MorphStyle::ImageRelief.shape_target(Mode::Home);
        assert_eq!(a, b);
        assert_eq!(a.freq_r, 1.0);
        assert_eq!(a.freq_a, 3.0);
    }

    #[test]
    fn contacts_scale_differs_per_style() {
        assert_eq!(MorphStyle::WaveLine.shape_target(Mode::Contacts).scale, 4.0);
        assert_eq!(MorphStyle::ImageRelief.shape_target(Mode::Contacts).scale, 0.7);
    }

    #[test]
    fn style_names_parse() {
        assert_eq!(MorphStyle::from_name("wave"), Some(MorphStyle::WaveLine));
        assert_eq!(MorphStyle::from_name("relief"), Some(MorphStyle::ImageRelief));
        assert_eq!(MorphStyle::from_name("cube"), None);
    }
}
