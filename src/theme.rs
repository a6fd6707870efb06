use nu_ansi_term::{Color, Style};

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);

        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

/// Colors used when rendering traces and tape windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colors {
    pub cell_zero: Color,
    pub cell_nonzero: Color,
    pub cell_pointer: Color,
    pub action: Color,
    pub waiting: Color,
    pub error: Color,
}

impl Default for Colors {
    fn default() -> Self {
        use catppuccin::Mocha as P;
        Self {
            cell_zero: P::SURFACE2,
            cell_nonzero: P::TEXT,
            cell_pointer: P::YELLOW,
            action: P::SKY,
            waiting: P::PEACH,
            error: P::RED,
        }
    }
}

impl Colors {
    pub fn pointer(&self) -> Style {
        Style::new().fg(self.cell_pointer).bold()
    }

    pub fn cell(&self, value: i64) -> Style {
        if value == 0 {
            Style::new().fg(self.cell_zero)
        } else {
            Style::new().fg(self.cell_nonzero)
        }
    }
}

/// Per-instruction style, mirroring the REPL highlighter groups:
/// movement, data, I/O, flow control, comments.
pub fn op_style(ch: char) -> Style {
    use catppuccin::Mocha as P;
    match ch {
        '>' | '<' => Style::new().fg(P::SKY).bold(),
        '+' => Style::new().fg(P::GREEN).bold(),
        '-' => Style::new().fg(P::RED).bold(),
        '.' => Style::new().fg(P::YELLOW).bold(),
        ',' => Style::new().fg(P::PEACH).bold(),
        '[' | ']' => Style::new().fg(P::MAUVE).bold(),
        _ => Style::new().fg(P::SURFACE2),
    }
}

/// Parse `#RRGGBB` or a named ANSI color.
pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }
    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "darkgray" | "dark_gray" | "darkgrey" | "dark_grey" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightyellow" | "light_yellow" => Color::LightYellow,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" | "lightpurple" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "lightgray" | "light_gray" | "lightgrey" => Color::LightGray,
        _ => return None,
    })
}
