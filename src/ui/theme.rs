use ratatui::style::Color;

/// Color palette for the whole interface. Two presets; unknown config
/// values fall back to dark so a typo never breaks startup.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub panel_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub table_header_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub running_fg: Color,
    pub statusbar_bg: Color,
    pub status_ok: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub sparkline_color: Color,
}

impl Theme {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            panel_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Green,
            table_header_fg: Color::Yellow,
            selection_bg: Color::Rgb(49, 50, 68),
            selection_fg: Color::White,
            running_fg: Color::Rgb(166, 227, 161),
            statusbar_bg: Color::DarkGray,
            status_ok: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            sparkline_color: Color::Rgb(251, 146, 60),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            panel_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Blue,
            table_header_fg: Color::Blue,
            selection_bg: Color::Rgb(200, 220, 240),
            selection_fg: Color::Black,
            running_fg: Color::Rgb(0, 120, 0),
            statusbar_bg: Color::Rgb(220, 220, 220),
            status_ok: Color::Rgb(0, 120, 0),
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            sparkline_color: Color::Rgb(70, 130, 180),
        }
    }
}
