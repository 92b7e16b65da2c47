//! RGBA colors with floating point channels

/// Color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn from_bytes(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self::rgba(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
            alpha as f64 / 255.0,
        )
    }

    pub fn red_byte(&self) -> u8 {
        to_byte(self.red)
    }

    pub fn green_byte(&self) -> u8 {
        to_byte(self.green)
    }

    pub fn blue_byte(&self) -> u8 {
        to_byte(self.blue)
    }

    pub fn alpha_byte(&self) -> u8 {
        to_byte(self.alpha)
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// `#RRGGBB`, alpha not included
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            self.red_byte(),
            self.green_byte(),
            self.blue_byte()
        )
    }

    /// Channel-wise linear interpolation, `t = 0` gives `self`
    pub fn lerp(&self, to: &Color, t: f64) -> Color {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Color::rgba(
            mix(self.red, to.red),
            mix(self.green, to.green),
            mix(self.blue, to.blue),
            mix(self.alpha, to.alpha),
        )
    }

    /// Build from hue, saturation and lightness, each in `[0, 1]`.
    ///
    /// Hue is a fraction of a full turn, so `1/3` is green.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        if saturation == 0.0 {
            return Self::rgba(lightness, lightness, lightness, alpha);
        }
        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        Self::rgba(
            hue_to_channel(p, q, hue + 1.0 / 3.0),
            hue_to_channel(p, q, hue),
            hue_to_channel(p, q, hue - 1.0 / 3.0),
            alpha,
        )
    }

    /// Build from hue, saturation and brightness (value), each in `[0, 1]`
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let v = brightness;
        let p = v * (1.0 - saturation);
        let q = v * (1.0 - saturation * f);
        let t = v * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgba(r, g, b, alpha)
    }

    /// `(hue, saturation, lightness)`, the inverse of [`Color::from_hsl`]
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let max = self.red.max(self.green).max(self.blue);
        let min = self.red.min(self.green).min(self.blue);
        let lightness = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, lightness);
        }
        let delta = max - min;
        let saturation = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        (self.hue(max, delta), saturation, lightness)
    }

    /// `(hue, saturation, brightness)`, the inverse of [`Color::from_hsb`]
    pub fn to_hsb(&self) -> (f64, f64, f64) {
        let max = self.red.max(self.green).max(self.blue);
        let min = self.red.min(self.green).min(self.blue);
        let delta = max - min;
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        if delta == 0.0 {
            return (0.0, saturation, max);
        }
        (self.hue(max, delta), saturation, max)
    }

    fn hue(&self, max: f64, delta: f64) -> f64 {
        let sixths = if max == self.red {
            (self.green - self.blue) / delta
        } else if max == self.green {
            (self.blue - self.red) / delta + 2.0
        } else {
            (self.red - self.green) / delta + 4.0
        };
        (sixths / 6.0).rem_euclid(1.0)
    }

    /// Parse a CSS-style color: a name, `#RGB`, `#RRGGBB`, `rgb(..)` or `rgba(..)`.
    ///
    /// Returns `None` for anything it does not understand.
    pub fn parse(text: &str) -> Option<Color> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = text.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgba") {
            return parse_rgb_args(args, true);
        }
        if let Some(args) = function_args(&lower, "rgb") {
            return parse_rgb_args(args, false);
        }
        named(&lower)
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_bytes(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            255,
        )),
        6 => Some(Color::from_bytes(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_bytes(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<f64> {
        match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0),
            None => s.parse::<f64>().ok().map(|v| v / 255.0),
        }
    };
    let alpha = if with_alpha {
        parts[3].parse::<f64>().ok()?
    } else {
        1.0
    };
    Some(Color::rgba(
        channel(parts[0])?.clamp(0.0, 1.0),
        channel(parts[1])?.clamp(0.0, 1.0),
        channel(parts[2])?.clamp(0.0, 1.0),
        alpha.clamp(0.0, 1.0),
    ))
}

fn named(name: &str) -> Option<Color> {
    let rgb = match name {
        "transparent" => return Some(Color::CLEAR),
        "aliceblue" => 0xF0F8FF,
        "antiquewhite" => 0xFAEBD7,
        "aqua" | "cyan" => 0x00FFFF,
        "aquamarine" => 0x7FFFD4,
        "azure" => 0xF0FFFF,
        "beige" => 0xF5F5DC,
        "bisque" => 0xFFE4C4,
        "black" => 0x000000,
        "blanchedalmond" => 0xFFEBCD,
        "blue" => 0x0000FF,
        "blueviolet" => 0x8A2BE2,
        "brown" => 0xA52A2A,
        "burlywood" => 0xDEB887,
        "cadetblue" => 0x5F9EA0,
        "chartreuse" => 0x7FFF00,
        "chocolate" => 0xD2691E,
        "coral" => 0xFF7F50,
        "cornflowerblue" => 0x6495ED,
        "cornsilk" => 0xFFF8DC,
        "crimson" => 0xDC143C,
        "darkblue" => 0x00008B,
        "darkcyan" => 0x008B8B,
        "darkgoldenrod" => 0xB8860B,
        "darkgray" | "darkgrey" => 0xA9A9A9,
        "darkgreen" => 0x006400,
        "darkkhaki" => 0xBDB76B,
        "darkmagenta" => 0x8B008B,
        "darkolivegreen" => 0x556B2F,
        "darkorange" => 0xFF8C00,
        "darkorchid" => 0x9932CC,
        "darkred" => 0x8B0000,
        "darksalmon" => 0xE9967A,
        "darkseagreen" => 0x8FBC8F,
        "darkslateblue" => 0x483D8B,
        "darkslategray" | "darkslategrey" => 0x2F4F4F,
        "darkturquoise" => 0x00CED1,
        "darkviolet" => 0x9400D3,
        "deeppink" => 0xFF1493,
        "deepskyblue" => 0x00BFFF,
        "dimgray" | "dimgrey" => 0x696969,
        "dodgerblue" => 0x1E90FF,
        "firebrick" => 0xB22222,
        "floralwhite" => 0xFFFAF0,
        "forestgreen" => 0x228B22,
        "fuchsia" | "magenta" => 0xFF00FF,
        "gainsboro" => 0xDCDCDC,
        "ghostwhite" => 0xF8F8FF,
        "gold" => 0xFFD700,
        "goldenrod" => 0xDAA520,
        "gray" | "grey" => 0x808080,
        "green" => 0x008000,
        "greenyellow" => 0xADFF2F,
        "honeydew" => 0xF0FFF0,
        "hotpink" => 0xFF69B4,
        "indianred" => 0xCD5C5C,
        "indigo" => 0x4B0082,
        "ivory" => 0xFFFFF0,
        "khaki" => 0xF0E68C,
        "lavender" => 0xE6E6FA,
        "lavenderblush" => 0xFFF0F5,
        "lawngreen" => 0x7CFC00,
        "lemonchiffon" => 0xFFFACD,
        "lightblue" => 0xADD8E6,
        "lightcoral" => 0xF08080,
        "lightcyan" => 0xE0FFFF,
        "lightgoldenrodyellow" => 0xFAFAD2,
        "lightgray" | "lightgrey" => 0xD3D3D3,
        "lightgreen" => 0x90EE90,
        "lightpink" => 0xFFB6C1,
        "lightsalmon" => 0xFFA07A,
        "lightseagreen" => 0x20B2AA,
        "lightskyblue" => 0x87CEFA,
        "lightslategray" | "lightslategrey" => 0x778899,
        "lightsteelblue" => 0xB0C4DE,
        "lightyellow" => 0xFFFFE0,
        "lime" => 0x00FF00,
        "limegreen" => 0x32CD32,
        "linen" => 0xFAF0E6,
        "maroon" => 0x800000,
        "mediumaquamarine" => 0x66CDAA,
        "mediumblue" => 0x0000CD,
        "mediumorchid" => 0xBA55D3,
        "mediumpurple" => 0x9370DB,
        "mediumseagreen" => 0x3CB371,
        "mediumslateblue" => 0x7B68EE,
        "mediumspringgreen" => 0x00FA9A,
        "mediumturquoise" => 0x48D1CC,
        "mediumvioletred" => 0xC71585,
        "midnightblue" => 0x191970,
        "mintcream" => 0xF5FFFA,
        "mistyrose" => 0xFFE4E1,
        "moccasin" => 0xFFE4B5,
        "navajowhite" => 0xFFDEAD,
        "navy" => 0x000080,
        "oldlace" => 0xFDF5E6,
        "olive" => 0x808000,
        "olivedrab" => 0x6B8E23,
        "orange" => 0xFFA500,
        "orangered" => 0xFF4500,
        "orchid" => 0xDA70D6,
        "palegoldenrod" => 0xEEE8AA,
        "palegreen" => 0x98FB98,
        "paleturquoise" => 0xAFEEEE,
        "palevioletred" => 0xDB7093,
        "papayawhip" => 0xFFEFD5,
        "peachpuff" => 0xFFDAB9,
        "peru" => 0xCD853F,
        "pink" => 0xFFC0CB,
        "plum" => 0xDDA0DD,
        "powderblue" => 0xB0E0E6,
        "purple" => 0x800080,
        "rebeccapurple" => 0x663399,
        "red" => 0xFF0000,
        "rosybrown" => 0xBC8F8F,
        "royalblue" => 0x4169E1,
        "saddlebrown" => 0x8B4513,
        "salmon" => 0xFA8072,
        "sandybrown" => 0xF4A460,
        "seagreen" => 0x2E8B57,
        "seashell" => 0xFFF5EE,
        "sienna" => 0xA0522D,
        "silver" => 0xC0C0C0,
        "skyblue" => 0x87CEEB,
        "slateblue" => 0x6A5ACD,
        "slategray" | "slategrey" => 0x708090,
        "snow" => 0xFFFAFA,
        "springgreen" => 0x00FF7F,
        "steelblue" => 0x4682B4,
        "tan" => 0xD2B48C,
        "teal" => 0x008080,
        "thistle" => 0xD8BFD8,
        "tomato" => 0xFF6347,
        "turquoise" => 0x40E0D0,
        "violet" => 0xEE82EE,
        "wheat" => 0xF5DEB3,
        "white" => 0xFFFFFF,
        "whitesmoke" => 0xF5F5F5,
        "yellow" => 0xFFFF00,
        "yellowgreen" => 0x9ACD32,
        _ => return None,
    };
    let [_, r, g, b] = u32::to_be_bytes(rgb);
    Some(Color::from_bytes(r, g, b, 255))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(c: Color) -> (u8, u8, u8) {
        (c.red_byte(), c.green_byte(), c.blue_byte())
    }

    /// Channels may round to a neighbouring byte after a conversion round trip
    fn assert_close_bytes(actual: Color, expected: Color) {
        let (a, e) = (bytes(actual), bytes(expected));
        for (x, y) in [(a.0, e.0), (a.1, e.1), (a.2, e.2)] {
            assert!(x.abs_diff(y) <= 1, "{:?} vs {:?}", a, e);
        }
    }

    #[test]
    fn test_byte_rounding() {
        let c = Color::rgb(0.5, 1.0 / 255.0, 0.0);
        assert_eq!(c.red_byte(), 128);
        assert_eq!(c.green_byte(), 1);
        assert_eq!(Color::rgb(1.5, -0.2, 0.0).red_byte(), 255);
        assert_eq!(Color::rgb(1.5, -0.2, 0.0).green_byte(), 0);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(bytes(Color::parse("#FF8000").unwrap()), (255, 128, 0));
        assert_eq!(bytes(Color::parse("#f80").unwrap()), (255, 136, 0));
        assert!(Color::parse("#12345").is_none());
        assert!(Color::parse("#GGGGGG").is_none());
    }

    #[test]
    fn test_parse_named_and_functions() {
        assert_eq!(bytes(Color::parse("Red").unwrap()), (255, 0, 0));
        assert_eq!(bytes(Color::parse("cornflowerblue").unwrap()), (100, 149, 237));
        assert_eq!(Color::parse("transparent").unwrap().alpha, 0.0);
        assert_eq!(bytes(Color::parse("rgb(10, 20, 30)").unwrap()), (10, 20, 30));
        assert_eq!(bytes(Color::parse("rgb(100%,0%,50%)").unwrap()), (255, 0, 128));
        let c = Color::parse("rgba(0,0,255,0.5)").unwrap();
        assert_eq!(c.alpha, 0.5);
    }

    #[test]
    fn test_parse_never_panics() {
        for junk in ["", "#", "rgb(", "rgb(1,2)", "url(#x)", "none", "  ", "#ZZZ", "rgba(1,2,3)"] {
            assert!(Color::parse(junk).is_none(), "{junk:?} should not parse");
        }
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::from_bytes(255, 128, 0, 255).to_hex(), "#FF8000");
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_hsl_inverse() {
        let c = Color::rgb(0.2, 0.6, 0.4);
        let (h, s, l) = c.to_hsl();
        let back = Color::from_hsl(h, s, l, 1.0);
        assert_close_bytes(back, c);
    }

    #[test]
    fn test_hsb_inverse() {
        let c = Color::rgb(0.9, 0.3, 0.1);
        let (h, s, b) = c.to_hsb();
        let back = Color::from_hsb(h, s, b, 1.0);
        assert_close_bytes(back, c);
    }
}
