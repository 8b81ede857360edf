//! Background gradient and animation for a weather condition.
//!
//! Night only changes the Clear branch: a clear night gets the night theme,
//! while rain, clouds and the rest keep their daytime look after dark.

use serde::{Serialize, Serializer};

use crate::types::WeatherCondition;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Animation asset shown with the current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKey {
    Sunny,
    Cloudy,
    Rain,
    Thunder,
    Snow,
    Night,
}

impl AnimationKey {
    /// File name of the bundled animation
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny.json",
            Self::Cloudy => "cloudy.json",
            Self::Rain => "rain.json",
            Self::Thunder => "thunder.json",
            Self::Snow => "snow.json",
            Self::Night => "night.json",
        }
    }
}

/// Gradient and animation for one (condition, day/night) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationTheme {
    pub gradient: (Color, Color),
    pub animation: AnimationKey,
}

impl PresentationTheme {
    const fn new(start: Color, end: Color, animation: AnimationKey) -> Self {
        Self {
            gradient: (start, end),
            animation,
        }
    }

    pub const NIGHT: Self = Self::new(
        Color::rgb(0x00, 0x04, 0x28),
        Color::rgb(0x00, 0x4E, 0x92),
        AnimationKey::Night,
    );
    pub const SUNNY: Self = Self::new(
        Color::rgb(0xFF, 0xD2, 0x00),
        Color::rgb(0xFF, 0x8C, 0x00),
        AnimationKey::Sunny,
    );
    pub const CLOUDY: Self = Self::new(
        Color::rgb(0xD7, 0xD2, 0xCC),
        Color::rgb(0x30, 0x43, 0x52),
        AnimationKey::Cloudy,
    );
    pub const RAIN: Self = Self::new(
        Color::rgb(0x4F, 0xAC, 0xFE),
        Color::rgb(0x00, 0xF2, 0xFE),
        AnimationKey::Rain,
    );
    pub const THUNDER: Self = Self::new(
        Color::rgb(0xF7, 0xB7, 0x33),
        Color::rgb(0x4B, 0x12, 0x48),
        AnimationKey::Thunder,
    );
    pub const SNOW: Self = Self::new(
        Color::rgb(0xE0, 0xEA, 0xFC),
        Color::rgb(0xCF, 0xDE, 0xF3),
        AnimationKey::Snow,
    );
    /// Mist and fog: slate gradient, there is no fog animation
    pub const FOG: Self = Self::new(
        Color::rgb(0xBD, 0xC3, 0xC7),
        Color::rgb(0x2C, 0x3E, 0x50),
        AnimationKey::Cloudy,
    );
    /// Unrecognized conditions
    pub const NEUTRAL: Self = Self::new(
        Color::rgb(0x83, 0xA4, 0xD4),
        Color::rgb(0xB6, 0xFB, 0xFF),
        AnimationKey::Cloudy,
    );
}

/// Pick the theme for a condition.
pub fn select_theme(condition: &WeatherCondition, is_night: bool) -> PresentationTheme {
    if is_night && *condition == WeatherCondition::Clear {
        return PresentationTheme::NIGHT;
    }

    match condition {
        WeatherCondition::Clear => PresentationTheme::SUNNY,
        WeatherCondition::Clouds => PresentationTheme::CLOUDY,
        WeatherCondition::Rain | WeatherCondition::Drizzle => PresentationTheme::RAIN,
        WeatherCondition::Thunderstorm => PresentationTheme::THUNDER,
        WeatherCondition::Snow => PresentationTheme::SNOW,
        WeatherCondition::Mist | WeatherCondition::Fog => PresentationTheme::FOG,
        WeatherCondition::Other(_) => PresentationTheme::NEUTRAL,
    }
}

/// [`select_theme`] for a raw provider condition string.
pub fn select_theme_for(main: &str, is_night: bool) -> PresentationTheme {
    select_theme(&WeatherCondition::from_main(main), is_night)
}
