//! Light/dark themes and their particle palettes.
//!
//! The theme is owned by the host (toggle button, persisted preference); the
//! animator only ever reads it through a [`ThemeHandle`].

use crate::color::{LinearRgb, Srgb};
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

const ALL_THEMES: &[Theme] = &[Theme::Light, Theme::Dark];

/// Page color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Colors used to render the field under one theme.
///
/// `deep` colors the troughs, `peak` the crests. `fog` is the distance fog
/// the scene eases toward and `background` is the page backdrop behind the
/// transparent render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub deep: Srgb,
    pub peak: Srgb,
    pub fog: Srgb,
    pub background: Srgb,
}

impl ThemePalette {
    /// Linear-space `(deep, peak)` pair for the height ramp.
    pub fn ramp(&self) -> (LinearRgb, LinearRgb) {
        (self.deep.to_linear(), self.peak.to_linear())
    }
}

impl Theme {
    pub fn palette(self) -> ThemePalette {
        match self {
            Theme::Dark => ThemePalette {
                deep: Srgb::from_u32(0x2b0057),
                peak: Srgb::from_u32(0x00f0ff),
                fog: Srgb::from_u32(0x020205),
                background: Srgb::from_u32(0x0a0514),
            },
            Theme::Light => ThemePalette {
                deep: Srgb::from_u32(0x3a86ff),
                peak: Srgb::from_u32(0x80ffdb),
                fog: Srgb::from_u32(0xf0f0f0),
                background: Srgb::from_u32(0xfdfdfd),
            },
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn all() -> &'static [Theme] {
        ALL_THEMES
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(FieldError::UnknownTheme(s.to_string())),
        }
    }
}

/// Shared, single-threaded handle to the active theme.
///
/// Clones observe the same value. The host writes through [`ThemeHandle::set`];
/// the frame update only calls [`ThemeHandle::get`].
#[derive(Debug, Clone, Default)]
pub struct ThemeHandle(Rc<Cell<Theme>>);

impl ThemeHandle {
    pub fn new(theme: Theme) -> Self {
        Self(Rc::new(Cell::new(theme)))
    }

    pub fn get(&self) -> Theme {
        self.0.get()
    }

    pub fn set(&self, theme: Theme) {
        self.0.set(theme);
    }

    /// Flips the theme and returns the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}
