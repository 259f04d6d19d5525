use std::fmt;
use std::str::FromStr;

/// A `DXGI_FORMAT` value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Format(pub u32);

impl Format {
    pub const UNKNOWN: Format = Format(0);
    pub const R16G16B16A16_FLOAT: Format = Format(10);
    pub const R10G10B10A2_UNORM: Format = Format(24);
    pub const R8G8B8A8_UNORM: Format = Format(28);
    pub const R8G8B8A8_UNORM_SRGB: Format = Format(29);
    pub const B8G8R8A8_UNORM: Format = Format(87);
    pub const B8G8R8A8_UNORM_SRGB: Format = Format(91);

    const NAMED: [(Format, &'static str); 7] = [
        (Self::UNKNOWN, "unknown"),
        (Self::R16G16B16A16_FLOAT, "r16g16b16a16-float"),
        (Self::R10G10B10A2_UNORM, "r10g10b10a2-unorm"),
        (Self::R8G8B8A8_UNORM, "r8g8b8a8-unorm"),
        (Self::R8G8B8A8_UNORM_SRGB, "r8g8b8a8-unorm-srgb"),
        (Self::B8G8R8A8_UNORM, "b8g8r8a8-unorm"),
        (Self::B8G8R8A8_UNORM_SRGB, "b8g8r8a8-unorm-srgb"),
    ];

    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(format, _)| *format == self)
            .map(|(_, name)| *name)
    }

    /// Size of one texel for the display formats this crate knows about.
    pub fn bytes_per_pixel(self) -> Option<u32> {
        match self {
            Self::R16G16B16A16_FLOAT => Some(8),
            Self::R10G10B10A2_UNORM
            | Self::R8G8B8A8_UNORM
            | Self::R8G8B8A8_UNORM_SRGB
            | Self::B8G8R8A8_UNORM
            | Self::B8G8R8A8_UNORM_SRGB => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "format-{}", self.0),
        }
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format({self})")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized format {0:?}")]
pub struct UnknownFormat(String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Some((format, _)) = Self::NAMED.iter().find(|(_, name)| *name == wanted) {
            return Ok(*format);
        }
        wanted
            .parse::<u32>()
            .map(Format)
            .map_err(|_| UnknownFormat(s.to_owned()))
    }
}

/// Refresh rate as a rational number of hertz. `0/0` means "unspecified".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const UNSPECIFIED: Rational = Rational::new(0, 0);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub const fn is_unspecified(&self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }

    pub fn hz(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scaling {
    #[default]
    Unspecified,
    Centered,
    Stretched,
}

impl Scaling {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Centered => "centered",
            Self::Stretched => "stretched",
        }
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanlineOrder {
    #[default]
    Unspecified,
    Progressive,
    UpperFieldFirst,
    LowerFieldFirst,
}

impl ScanlineOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Progressive => "progressive",
            Self::UpperFieldFirst => "upper-field-first",
            Self::LowerFieldFirst => "lower-field-first",
        }
    }
}

impl fmt::Display for ScanlineOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `DXGI_MODE_DESC`: one way of driving an output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: Rational,
    pub format: Format,
    pub scaling: Scaling,
    pub scanline_order: ScanlineOrder,
}

impl DisplayMode {
    /// A request that only pins the resolution and format.
    pub const fn sized(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            refresh_rate: Rational::UNSPECIFIED,
            format,
            scaling: Scaling::Unspecified,
            scanline_order: ScanlineOrder::Unspecified,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}\t\t{}\tscaling: {}\t\tscanline-ordering: {}",
            self.width, self.height, self.refresh_rate, self.scaling, self.scanline_order
        )
    }
}
