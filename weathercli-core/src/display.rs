//! Terminal rendering of weather reports.
//!
//! Escape codes are always emitted; there is no TTY detection.

use std::ops::Range;

use crate::model::{Condition, CurrentReport, ForecastReport, Temperature, Units};

pub mod ansi {
    pub const RED: &str = "\x1b[1;31m";
    pub const BLUE: &str = "\x1b[1;34m";
    pub const CYAN: &str = "\x1b[1;36m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const WHITE: &str = "\x1b[37m";
    pub const REVERSE: &str = "\x1b[;7m";
    pub const RESET: &str = "\x1b[0m";
}

/// Glyph and color used for one class of weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayParams {
    pub glyph: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone)]
pub struct ConditionRule {
    pub codes: Range<i64>,
    pub params: DisplayParams,
}

const fn rule(codes: Range<i64>, glyph: &'static str, color: &'static str) -> ConditionRule {
    ConditionRule { codes, params: DisplayParams { glyph, color } }
}

/// OpenWeather condition code groups, checked in order.
/// <https://openweathermap.org/weather-conditions#Weather-Condition-Codes-2>
pub const CONDITION_TABLE: &[ConditionRule] = &[
    rule(200..300, "⚡", ansi::RED),     // thunderstorm
    rule(300..400, "🌦️", ansi::CYAN),   // drizzle
    rule(500..600, "🌧️", ansi::BLUE),   // rain
    rule(600..700, "☃️", ansi::WHITE),  // snow
    rule(700..800, "🌀", ansi::BLUE),    // atmosphere
    rule(800..801, "☀️", ansi::YELLOW), // clear
    rule(801..900, "☁️", ansi::WHITE),  // clouds
];

/// Used for codes the API may add later.
pub const FALLBACK_PARAMS: DisplayParams = DisplayParams { glyph: "🌈", color: ansi::RESET };

/// Layout and palette injected into [`Renderer`].
#[derive(Debug, Clone)]
pub struct DisplayStyle {
    /// Width of the centered city and description fields.
    pub width: usize,
    /// Added to `width` for the forecast's city + time field.
    pub forecast_extra_width: usize,
    pub highlight: &'static str,
    pub reset: &'static str,
    pub conditions: &'static [ConditionRule],
    pub fallback: DisplayParams,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            width: 20,
            forecast_extra_width: 17,
            highlight: ansi::REVERSE,
            reset: ansi::RESET,
            conditions: CONDITION_TABLE,
            fallback: FALLBACK_PARAMS,
        }
    }
}

impl DisplayStyle {
    /// First rule containing `code` wins; unknown codes get the fallback.
    pub fn display_params(&self, code: i64) -> DisplayParams {
        self.conditions
            .iter()
            .find(|rule| rule.codes.contains(&code))
            .map_or(self.fallback, |rule| rule.params)
    }
}

/// Display parameters for `code` under the default style.
pub fn select_display_params(code: i64) -> DisplayParams {
    DisplayStyle::default().display_params(code)
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: DisplayStyle,
}

impl Renderer {
    pub fn new(style: DisplayStyle) -> Self {
        Self { style }
    }

    /// One line: highlighted city, condition, temperatures.
    pub fn render_current(&self, report: &CurrentReport, units: Units) -> String {
        let DisplayStyle { width, highlight, reset, .. } = self.style;
        let city = &report.city;
        let condition = self.condition_span(&report.condition);
        let Temperature { temp, feels_like } = report.temperature;
        let u = units.symbol();

        format!(
            "{highlight}{city:^width$}{reset}{condition}{temp:.1}°{u} (feels like {feels_like:.1}°{u})\n"
        )
    }

    /// One line per forecast period, in the order received.
    pub fn render_forecast(&self, report: &ForecastReport, units: Units) -> String {
        let DisplayStyle { width, forecast_extra_width, highlight, reset, .. } = self.style;
        let label_width = width + forecast_extra_width;
        let u = units.symbol();

        let mut out = String::new();
        for entry in &report.entries {
            let label = format!("{} {}", report.city, entry.local_label());
            let condition = self.condition_span(&entry.condition);
            let Temperature { temp, feels_like } = entry.temperature;

            out.push_str(&format!(
                "{highlight}{label:^label_width$}{reset}{condition}\
                 {temp:>4.1}°{u} (feels like {feels_like:>4.1}°{u})\n"
            ));
        }
        out
    }

    fn condition_span(&self, condition: &Condition) -> String {
        let DisplayParams { glyph, color } = self.style.display_params(condition.id);
        let description = capitalize(&condition.description);
        let (width, reset) = (self.style.width, self.style.reset);

        format!("{color} {glyph} {description:^width$}{glyph}  {reset}")
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
