use iced::Color;
use once_cell::sync::Lazy;

pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub panel_bg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub stripe_bg: Color,
    pub footer_bg: Color,
    pub footer_fg: Color,
    pub error_fg: Color,
}

pub static THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(1.0, 1.0, 1.0),
    fg: Color::from_rgb(0.1294, 0.1451, 0.1608), // #212529
    panel_bg: Color::from_rgb(0.9686, 0.9686, 0.9686), // #f7f7f7
    header_bg: Color::from_rgb(0.9725, 0.9765, 0.9804), // #f8f9fa
    header_fg: Color::from_rgb(0.1294, 0.1451, 0.1608),
    stripe_bg: Color::from_rgb(0.949, 0.949, 0.949), // #f2f2f2
    footer_bg: Color::from_rgb(0.0078, 0.325, 0.6118), // #02539c
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    error_fg: Color::from_rgb(1.0, 0.7216, 0.7216), // #ffb8b8, readable on the footer blue
});
