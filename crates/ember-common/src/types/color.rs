use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
///
/// In config files a color is written either as a channel array
/// (`[183, 140, 17]` or `[183, 140, 17, 255]`) or as a hex string
/// (`"#b78c11"`). It always serializes back to the array form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Channels(Vec<u8>),
    Hex(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Channels(c) => match c.as_slice() {
                [r, g, b] => Ok(Self::from_rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::from_rgba(*r, *g, *b, *a)),
                other => Err(format!(
                    "color must have 3 or 4 channels, got {}",
                    other.len()
                )),
            },
            ColorRepr::Hex(s) => Self::from_hex(&s).ok_or_else(|| format!("invalid hex color: {s}")),
        }
    }
}

impl From<Color> for ColorRepr {
    fn from(c: Color) -> Self {
        if c.a == 255 {
            ColorRepr::Channels(vec![c.r, c.g, c.b])
        } else {
            ColorRepr::Channels(vec![c.r, c.g, c.b, c.a])
        }
    }
}

impl Color {
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self { r, g, b, a: 255 })
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Channels divided by 255, alpha included.
    pub fn to_rgba_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Channels divided by 255, alpha dropped.
    pub fn to_rgb_f32(&self) -> [f32; 3] {
        let [r, g, b, _] = self.to_rgba_f32();
        [r, g, b]
    }
}
