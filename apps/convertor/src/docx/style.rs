//! Inline CSS and tag-level formatting, tracked while walking the HTML tree.

/// Paragraph alignment from `text-align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

/// Formatting inherited by text nodes. `size` is in half-points, as the
/// document format stores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<String>,
    pub size: Option<usize>,
    pub align: Option<Align>,
}

impl InlineStyle {
    /// Applies the formatting implied by a tag name, e.g. `<b>` or `<em>`.
    pub fn with_tag(&self, tag: &str) -> InlineStyle {
        let mut style = self.clone();
        match tag {
            "b" | "strong" | "th" => style.bold = true,
            "i" | "em" | "cite" | "var" => style.italic = true,
            "u" | "ins" => style.underline = true,
            "a" => {
                style.underline = true;
                style.color = Some("0563C1".to_string());
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                style.bold = true;
                style.size = Some(heading_size(tag));
            }
            _ => {}
        }
        style
    }

    /// Applies a `style="..."` attribute. Unknown properties and values are ignored.
    pub fn with_css(&self, css: &str) -> InlineStyle {
        let mut style = self.clone();
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim().to_ascii_lowercase();
            match property.as_str() {
                "font-weight" => match value.as_str() {
                    "bold" | "bolder" | "600" | "700" | "800" | "900" => style.bold = true,
                    "normal" | "lighter" | "100" | "200" | "300" | "400" => style.bold = false,
                    _ => {}
                },
                "font-style" => match value.as_str() {
                    "italic" | "oblique" => style.italic = true,
                    "normal" => style.italic = false,
                    _ => {}
                },
                "text-decoration" | "text-decoration-line" => {
                    if value.contains("underline") {
                        style.underline = true;
                    } else if value == "none" {
                        style.underline = false;
                    }
                }
                "color" => {
                    if let Some(hex) = parse_color(&value) {
                        style.color = Some(hex);
                    }
                }
                "font-size" => {
                    if let Some(size) = parse_font_size(&value) {
                        style.size = Some(size);
                    }
                }
                "text-align" => {
                    style.align = match value.as_str() {
                        "left" | "start" => Some(Align::Left),
                        "center" => Some(Align::Center),
                        "right" | "end" => Some(Align::Right),
                        "justify" => Some(Align::Justify),
                        _ => style.align,
                    }
                }
                _ => {}
            }
        }
        style
    }
}

/// Heading sizes in half-points, h1 largest.
pub fn heading_size(tag: &str) -> usize {
    match tag {
        "h1" => 32,
        "h2" => 28,
        "h3" => 26,
        "h4" => 24,
        _ => 22,
    }
}

/// Returns an uppercase `RRGGBB` string for `#rgb`, `#rrggbb`, `rgb(r, g, b)`
/// or a handful of named colors.
fn parse_color(value: &str) -> Option<String> {
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => Some(hex.chars().flat_map(|c| [c, c]).collect::<String>().to_uppercase()),
            6 => Some(hex.to_uppercase()),
            _ => None,
        };
    }
    if let Some(args) = value.strip_prefix("rgb(").and_then(|v| v.strip_suffix(')')) {
        let parts: Vec<u8> = args
            .split(',')
            .filter_map(|p| p.trim().parse::<u8>().ok())
            .collect();
        return match parts.as_slice() {
            [r, g, b] => Some(format!("{r:02X}{g:02X}{b:02X}")),
            _ => None,
        };
    }
    let named = match value {
        "black" => "000000",
        "white" => "FFFFFF",
        "red" => "FF0000",
        "green" => "008000",
        "blue" => "0000FF",
        "navy" => "000080",
        "gray" | "grey" => "808080",
        _ => return None,
    };
    Some(named.to_string())
}

/// Converts `pt` and `px` sizes to half-points.
fn parse_font_size(value: &str) -> Option<usize> {
    let (number, points_per_unit) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else {
        return None;
    };
    let number: f32 = number.trim().parse().ok()?;
    if number <= 0.0 {
        return None;
    }
    Some((number * points_per_unit * 2.0).round() as usize)
}
