use crate::foundation::error::{SnapError, SnapResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// One CSS-style filter function. Amounts are fractions (`1.0` == `100%`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "fn", content = "amount", rename_all = "snake_case")]
pub enum FilterFn {
    /// Linear multiply of every color channel.
    Brightness(f32),
    /// Scale around mid-gray.
    Contrast(f32),
    /// Luminance-preserving saturation; values above 1 oversaturate.
    Saturate(f32),
    /// Desaturate towards luminance, clamped to 1.
    Grayscale(f32),
    /// Blend towards the sepia tone matrix, clamped to 1.
    Sepia(f32),
    /// Rotate hue by degrees.
    HueRotate(f32),
}

impl FilterFn {
    fn is_identity(self) -> bool {
        match self {
            Self::Brightness(a) | Self::Contrast(a) | Self::Saturate(a) => a == 1.0,
            Self::Grayscale(a) | Self::Sepia(a) | Self::HueRotate(a) => a == 0.0,
        }
    }

    fn apply(self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Brightness(a) => rgb.map(|c| c * a),
            Self::Contrast(a) => rgb.map(|c| (c - 0.5) * a + 0.5),
            Self::Saturate(s) => mat3(saturate_matrix(s), rgb),
            Self::Grayscale(a) => mat3(grayscale_matrix(1.0 - a.min(1.0)), rgb),
            Self::Sepia(a) => mat3(sepia_matrix(1.0 - a.min(1.0)), rgb),
            Self::HueRotate(deg) => mat3(hue_rotate_matrix(deg), rgb),
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }

    fn parse(name: &str, arg: &str) -> SnapResult<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name == "hue-rotate" {
            return Ok(Self::HueRotate(parse_angle_deg(arg)?));
        }
        let amount = parse_amount(arg)?;
        match name.as_str() {
            "brightness" => Ok(Self::Brightness(amount)),
            "contrast" => Ok(Self::Contrast(amount)),
            "saturate" => Ok(Self::Saturate(amount)),
            "grayscale" => Ok(Self::Grayscale(amount)),
            "sepia" => Ok(Self::Sepia(amount)),
            _ => Err(SnapError::validation(format!(
                "unknown filter function '{name}'"
            ))),
        }
    }
}

/// An ordered chain of filter functions applied left to right.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterChain(Vec<FilterFn>);

impl FilterChain {
    /// Chain that leaves pixels unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a chain from explicit functions.
    pub fn new(fns: Vec<FilterFn>) -> Self {
        Self(fns)
    }

    /// Parse a CSS filter expression such as `"sepia(50%) hue-rotate(30deg) saturate(150%)"`.
    ///
    /// Empty input and `none` yield the identity chain.
    pub fn parse(expr: &str) -> SnapResult<Self> {
        let expr = expr.trim();
        if expr.is_empty() || expr.eq_ignore_ascii_case("none") {
            return Ok(Self::identity());
        }

        let mut fns = Vec::new();
        let mut rest = expr;
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| SnapError::validation(format!("malformed filter '{expr}'")))?;
            let close = rest[open..]
                .find(')')
                .map(|i| open + i)
                .ok_or_else(|| SnapError::validation(format!("unclosed filter in '{expr}'")))?;
            fns.push(FilterFn::parse(&rest[..open], &rest[open + 1..close])?);
            rest = rest[close + 1..].trim_start();
        }
        Ok(Self(fns))
    }

    /// Compose the editor adjustment sliders with a named look.
    ///
    /// Order is brightness, contrast, saturation, then the look's own functions.
    pub fn from_adjustment(brightness: f32, contrast: f32, saturation: f32, look: &Self) -> Self {
        let mut fns = vec![
            FilterFn::Brightness(brightness / 100.0),
            FilterFn::Contrast(contrast / 100.0),
            FilterFn::Saturate(saturation / 100.0),
        ];
        fns.extend(look.0.iter().copied());
        Self(fns)
    }

    /// Functions in application order.
    pub fn functions(&self) -> &[FilterFn] {
        &self.0
    }

    /// Return `true` when applying the chain cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|f| f.is_identity())
    }

    /// Apply the chain to a single straight-alpha RGB triple.
    pub fn apply_rgb8(&self, rgb: [u8; 3]) -> [u8; 3] {
        let mut c = rgb.map(|v| f32::from(v) / 255.0);
        for f in self.0.iter().filter(|f| !f.is_identity()) {
            c = f.apply(c);
        }
        c.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Apply the chain in place to tightly packed premultiplied RGBA8.
    pub fn apply_rgba8_premul_in_place(&self, rgba: &mut [u8]) -> SnapResult<()> {
        if !rgba.len().is_multiple_of(4) {
            return Err(SnapError::render(
                "color filter expects an rgba8 buffer",
            ));
        }
        if self.is_identity() {
            return Ok(());
        }

        unpremultiply_rgba8_in_place(rgba);
        for px in rgba.chunks_exact_mut(4) {
            if px[3] == 0 {
                continue;
            }
            let out = self.apply_rgb8([px[0], px[1], px[2]]);
            px[..3].copy_from_slice(&out);
        }
        premultiply_rgba8_in_place(rgba);
        Ok(())
    }
}

/// Named creative looks offered by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FilterPreset {
    /// No look.
    Original,
    /// Full sepia, slight contrast boost, darker.
    Vintage,
    /// Fully desaturated.
    Grayscale,
    /// Light sepia, more saturation and light.
    Warm,
    /// Hue rotated half-way round with extra saturation.
    Cool,
    /// Brighter with a little contrast.
    Bright,
    /// Darker with extra contrast.
    Dark,
    /// Half sepia with a warm hue shift.
    Retro,
    /// High contrast and saturation.
    Dramatic,
}

impl FilterPreset {
    /// Every preset in display order.
    pub const ALL: [FilterPreset; 9] = [
        Self::Original,
        Self::Vintage,
        Self::Grayscale,
        Self::Warm,
        Self::Cool,
        Self::Bright,
        Self::Dark,
        Self::Retro,
        Self::Dramatic,
    ];

    /// Display name, also accepted by [`FilterPreset::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Vintage => "Vintage",
            Self::Grayscale => "Grayscale",
            Self::Warm => "Warm",
            Self::Cool => "Cool",
            Self::Bright => "Bright",
            Self::Dark => "Dark",
            Self::Retro => "Retro",
            Self::Dramatic => "Dramatic",
        }
    }

    /// CSS filter expression of the look.
    pub fn expression(self) -> &'static str {
        match self {
            Self::Original => "",
            Self::Vintage => "sepia(100%) contrast(110%) brightness(90%)",
            Self::Grayscale => "grayscale(100%)",
            Self::Warm => "sepia(30%) saturate(150%) brightness(110%)",
            Self::Cool => "hue-rotate(180deg) saturate(120%)",
            Self::Bright => "brightness(120%) contrast(110%)",
            Self::Dark => "brightness(80%) contrast(120%)",
            Self::Retro => "sepia(50%) hue-rotate(30deg) saturate(150%)",
            Self::Dramatic => "contrast(150%) brightness(110%) saturate(120%)",
        }
    }

    /// Case-insensitive lookup; `none` and the empty string map to [`FilterPreset::Original`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            return Some(Self::Original);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Parsed filter chain of the look.
    pub fn chain(self) -> FilterChain {
        FilterChain::parse(self.expression()).unwrap_or_default()
    }
}

fn parse_amount(arg: &str) -> SnapResult<f32> {
    let arg = arg.trim();
    let (num, divisor) = match arg.strip_suffix('%') {
        Some(n) => (n, 100.0),
        None => (arg, 1.0),
    };
    let v: f32 = num
        .trim()
        .parse()
        .map_err(|_| SnapError::validation(format!("invalid filter amount '{arg}'")))?;
    let v = v / divisor;
    if !v.is_finite() || v < 0.0 {
        return Err(SnapError::validation(format!(
            "filter amount '{arg}' must be finite and >= 0"
        )));
    }
    Ok(v)
}

fn parse_angle_deg(arg: &str) -> SnapResult<f32> {
    let arg = arg.trim();
    let (num, to_deg) = if let Some(n) = arg.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = arg.strip_suffix("turn") {
        (n, 360.0)
    } else if let Some(n) = arg.strip_suffix("rad") {
        (n, 180.0 / std::f32::consts::PI)
    } else {
        (arg, 1.0)
    };
    let v: f32 = num
        .trim()
        .parse()
        .map_err(|_| SnapError::validation(format!("invalid hue-rotate angle '{arg}'")))?;
    let v = v * to_deg;
    if !v.is_finite() {
        return Err(SnapError::validation("hue-rotate angle must be finite"));
    }
    Ok(v)
}

type Mat3 = [[f32; 3]; 3];

fn mat3(m: Mat3, c: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * c[0] + m[0][1] * c[1] + m[0][2] * c[2],
        m[1][0] * c[0] + m[1][1] * c[1] + m[1][2] * c[2],
        m[2][0] * c[0] + m[2][1] * c[1] + m[2][2] * c[2],
    ]
}

fn saturate_matrix(s: f32) -> Mat3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(s: f32) -> Mat3 {
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(s: f32) -> Mat3 {
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn hue_rotate_matrix(deg: f32) -> Mat3 {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/compose/filter.rs"]
mod tests;
