//! Screen colors.

use crate::render::Color;

const VOLTAGE_PALETTE: [Color; 4] = [
    Color::new(1.0, 1.0, 0.0, 1.0),
    Color::new(0.0, 1.0, 0.0, 1.0),
    Color::new(0.0, 0.75, 1.0, 1.0),
    Color::new(1.0, 0.0, 1.0, 1.0),
];

/// Visual theme of the scope screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Screen background.
    pub background: Color,
    /// Grid dots.
    pub grid: Color,
    /// Axes and their ticks.
    pub axes: Color,
    /// Screen border.
    pub border: Color,
    /// Time markers.
    pub markers: Color,
    /// Label text.
    pub text: Color,
    /// Voltage trace colors, cycled per channel.
    pub voltage: Vec<Color>,
    /// Spectrum trace colors, cycled per channel.
    pub spectrum: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            grid: Color::new(0.5, 0.5, 0.5, 1.0),
            axes: Color::new(0.75, 0.75, 0.75, 1.0),
            border: Color::WHITE,
            markers: Color::WHITE,
            text: Color::WHITE,
            voltage: VOLTAGE_PALETTE.to_vec(),
            spectrum: VOLTAGE_PALETTE.iter().map(|color| color.darker(2.0)).collect(),
        }
    }
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of a voltage channel.
    pub fn voltage_color(&self, channel: usize) -> Color {
        cycle(&self.voltage, channel)
    }

    /// Color of a spectrum channel.
    pub fn spectrum_color(&self, channel: usize) -> Color {
        cycle(&self.spectrum, channel)
    }
}

fn cycle(palette: &[Color], channel: usize) -> Color {
    if palette.is_empty() {
        return Color::WHITE;
    }
    palette[channel % palette.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_colors_cycle() {
        let theme = Theme::default();
        assert_eq!(theme.voltage_color(0), theme.voltage_color(4));
        assert_ne!(theme.voltage_color(0), theme.spectrum_color(0));
        let empty = Theme {
            voltage: Vec::new(),
            ..Theme::default()
        };
        assert_eq!(empty.voltage_color(3), Color::WHITE);
    }
}
