use crate::image_pipeline::simulate::matrix::ColorTransformMatrix;

/// Colour vision deficiency to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulationMode {
    /// Normal colour vision
    #[default]
    Normal,
    /// Red-blind
    Protanopia,
    /// Red-weak
    Protanomaly,
    /// Green-blind
    Deuteranopia,
    /// Green-weak
    Deuteranomaly,
    /// Blue-blind
    Tritanopia,
    /// Blue-weak
    Tritanomaly,
    /// Total colour blindness
    Achromatopsia,
    /// Partial colour blindness
    Achromatomaly,
}

const PROTANOPIA: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.567, 0.433, 0.0, 0.558, 0.442, 0.0, 0.0, 0.242, 0.758]);
const PROTANOMALY: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.817, 0.183, 0.0, 0.333, 0.667, 0.0, 0.0, 0.125, 0.875]);
const DEUTERANOPIA: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.625, 0.375, 0.0, 0.7, 0.3, 0.0, 0.0, 0.3, 0.7]);
const DEUTERANOMALY: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.8, 0.2, 0.0, 0.258, 0.742, 0.0, 0.0, 0.142, 0.858]);
const TRITANOPIA: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.95, 0.05, 0.0, 0.0, 0.433, 0.567, 0.0, 0.475, 0.525]);
const TRITANOMALY: ColorTransformMatrix =
    ColorTransformMatrix::from_flat([0.967, 0.033, 0.0, 0.0, 0.733, 0.267, 0.0, 0.183, 0.817]);
const ACHROMATOPSIA: ColorTransformMatrix = ColorTransformMatrix::from_flat([
    0.299, 0.587, 0.114, 0.299, 0.587, 0.114, 0.299, 0.587, 0.114,
]);
const ACHROMATOMALY: ColorTransformMatrix = ColorTransformMatrix::from_flat([
    0.618, 0.320, 0.062, 0.163, 0.775, 0.062, 0.163, 0.320, 0.516,
]);

impl SimulationMode {
    pub const ALL: [SimulationMode; 9] = [
        SimulationMode::Normal,
        SimulationMode::Protanopia,
        SimulationMode::Protanomaly,
        SimulationMode::Deuteranopia,
        SimulationMode::Deuteranomaly,
        SimulationMode::Tritanopia,
        SimulationMode::Tritanomaly,
        SimulationMode::Achromatopsia,
        SimulationMode::Achromatomaly,
    ];

    pub fn matrix(&self) -> ColorTransformMatrix {
        match self {
            SimulationMode::Normal => ColorTransformMatrix::IDENTITY,
            SimulationMode::Protanopia => PROTANOPIA,
            SimulationMode::Protanomaly => PROTANOMALY,
            SimulationMode::Deuteranopia => DEUTERANOPIA,
            SimulationMode::Deuteranomaly => DEUTERANOMALY,
            SimulationMode::Tritanopia => TRITANOPIA,
            SimulationMode::Tritanomaly => TRITANOMALY,
            SimulationMode::Achromatopsia => ACHROMATOPSIA,
            SimulationMode::Achromatomaly => ACHROMATOMALY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimulationMode::Normal => "Normal Vision",
            SimulationMode::Protanopia => "Protanopia (Red-Blind)",
            SimulationMode::Protanomaly => "Protanomaly (Red-Weak)",
            SimulationMode::Deuteranopia => "Deuteranopia (Green-Blind)",
            SimulationMode::Deuteranomaly => "Deuteranomaly (Green-Weak)",
            SimulationMode::Tritanopia => "Tritanopia (Blue-Blind)",
            SimulationMode::Tritanomaly => "Tritanomaly (Blue-Weak)",
            SimulationMode::Achromatopsia => "Achromatopsia (Monochromacy)",
            SimulationMode::Achromatomaly => "Achromatomaly (Partial Monochromacy)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SimulationMode::Normal => "Unchanged colours",
            SimulationMode::Protanopia => "No red cones; reds and greens are confused",
            SimulationMode::Protanomaly => "Weak red cones; reds appear duller",
            SimulationMode::Deuteranopia => "No green cones; reds and greens are confused",
            SimulationMode::Deuteranomaly => "Weak green cones; the most common deficiency",
            SimulationMode::Tritanopia => "No blue cones; blues and yellows are confused",
            SimulationMode::Tritanomaly => "Weak blue cones",
            SimulationMode::Achromatopsia => "No colour perception, only brightness",
            SimulationMode::Achromatomaly => "Strongly reduced colour perception",
        }
    }

    /// Lookup by the lowercase identifier used in URLs and the demo binary.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            SimulationMode::Normal => "normal",
            SimulationMode::Protanopia => "protanopia",
            SimulationMode::Protanomaly => "protanomaly",
            SimulationMode::Deuteranopia => "deuteranopia",
            SimulationMode::Deuteranomaly => "deuteranomaly",
            SimulationMode::Tritanopia => "tritanopia",
            SimulationMode::Tritanomaly => "tritanomaly",
            SimulationMode::Achromatopsia => "achromatopsia",
            SimulationMode::Achromatomaly => "achromatomaly",
        }
    }
}
