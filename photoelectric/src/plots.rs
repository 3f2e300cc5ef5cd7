//! Chart panel drawn with egui painter primitives
//!
//! Six tabs: the four sweep charts (with their saved overlays), the
//! oscilloscope trace and the scrolling KE tracker.

use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use crate::history::RollingHistory;
use crate::session::Session;
use crate::sweep::{SweepChart, SweepQuantity};
use crate::oscilloscope::TRACE_HALF_WINDOW;

const LIVE_COLOR: Color32 = Color32::from_rgb(0, 160, 255);
const SAVED_COLOR: Color32 = Color32::from_rgb(255, 140, 60);
const TRACE_COLOR: Color32 = Color32::from_rgb(120, 255, 120);
const TRACKER_COLOR: Color32 = Color32::from_rgb(255, 220, 80);
const AXIS_COLOR: Color32 = Color32::from_gray(160);
const BACKGROUND: Color32 = Color32::from_gray(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTab {
    KeVsWavelength,
    KeVsFrequency,
    CurrentVsWavelength,
    CurrentVsFrequency,
    Oscilloscope,
    KeTracker,
}

impl ChartTab {
    pub const ALL: [ChartTab; 6] = [
        ChartTab::KeVsWavelength,
        ChartTab::KeVsFrequency,
        ChartTab::CurrentVsWavelength,
        ChartTab::CurrentVsFrequency,
        ChartTab::Oscilloscope,
        ChartTab::KeTracker,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartTab::KeVsWavelength => "KE vs λ",
            ChartTab::KeVsFrequency => "KE vs f",
            ChartTab::CurrentVsWavelength => "I vs λ",
            ChartTab::CurrentVsFrequency => "I vs f",
            ChartTab::Oscilloscope => "Oscilloscope",
            ChartTab::KeTracker => "KE tracker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesStyle {
    Line,
    Dots,
}

struct Series {
    points: Vec<(f64, f64)>,
    color: Color32,
    style: SeriesStyle,
}

/// Data-space window of a plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRanges {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl PlotRanges {
    /// Map a data point into `rect`, y flipped so larger values sit higher.
    /// Points outside the ranges are clamped to the frame.
    pub fn to_screen(&self, rect: Rect, (x, y): (f64, f64)) -> Pos2 {
        let x_norm = normalise(x, self.x);
        let y_norm = 1.0 - normalise(y, self.y);
        Pos2::new(
            rect.min.x + x_norm as f32 * rect.width(),
            rect.min.y + y_norm as f32 * rect.height(),
        )
    }
}

fn normalise(value: f64, (min, max): (f64, f64)) -> f64 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

pub fn draw_chart(ui: &mut egui::Ui, tab: ChartTab, session: &Session) {
    let charts = session.charts();
    match tab {
        ChartTab::KeVsWavelength => draw_sweep_chart(ui, &charts.ke_vs_wavelength),
        ChartTab::KeVsFrequency => draw_sweep_chart(ui, &charts.ke_vs_frequency),
        ChartTab::CurrentVsWavelength => draw_sweep_chart(ui, &charts.current_vs_wavelength),
        ChartTab::CurrentVsFrequency => draw_sweep_chart(ui, &charts.current_vs_frequency),
        ChartTab::Oscilloscope => draw_oscilloscope(ui, session.oscilloscope_trace()),
        ChartTab::KeTracker => draw_ke_tracker(ui, session.ke_tracker()),
    }
}

fn draw_sweep_chart(ui: &mut egui::Ui, chart: &SweepChart) {
    let ranges = PlotRanges {
        x: chart.axis.range(),
        y: chart.quantity.range(),
    };
    let style = match chart.quantity {
        SweepQuantity::KineticEnergy => SeriesStyle::Line,
        SweepQuantity::Current => SeriesStyle::Dots,
    };
    let series = [
        Series {
            points: chart.saved_points().collect(),
            color: SAVED_COLOR,
            style,
        },
        Series {
            points: chart.points().collect(),
            color: LIVE_COLOR,
            style,
        },
    ];
    draw_plot(ui, chart.axis.title(), chart.quantity.title(), ranges, &series);
}

fn draw_oscilloscope(ui: &mut egui::Ui, trace: &[(f64, f64)]) {
    let ranges = PlotRanges {
        x: (-TRACE_HALF_WINDOW, TRACE_HALF_WINDOW),
        y: (-1.1, 1.1),
    };
    let series = [Series {
        points: trace.to_vec(),
        color: TRACE_COLOR,
        style: SeriesStyle::Line,
    }];
    draw_plot(ui, "Time (s)", "Amplitude", ranges, &series);
}

fn draw_ke_tracker(ui: &mut egui::Ui, history: &RollingHistory) {
    let ranges = PlotRanges {
        x: (0.0, history.config().arrival_marker),
        y: (-0.1, 11.0),
    };
    let series = [Series {
        points: history.points().map(|p| (p.time, p.value)).filter(|&(t, _)| t >= 0.0).collect(),
        color: TRACKER_COLOR,
        style: SeriesStyle::Dots,
    }];
    draw_plot(ui, "Time", "Kinetic energy (eV)", ranges, &series);
}

fn draw_plot(ui: &mut egui::Ui, x_label: &str, y_label: &str, ranges: PlotRanges, series: &[Series]) {
    let available = ui.available_size();
    let plot_size = egui::Vec2::new((available.x - 70.0).max(50.0), (available.y - 30.0).max(50.0));

    ui.horizontal(|ui| {
        ui.add_space(60.0);
        let (rect, _response) = ui.allocate_exact_size(plot_size, egui::Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter();
        painter.rect_filled(rect, 2.0, BACKGROUND);
        painter.rect_stroke(rect, 2.0, Stroke::new(1.0, AXIS_COLOR));

        // Zero line
        if ranges.y.0 < 0.0 && ranges.y.1 > 0.0 {
            let a = ranges.to_screen(rect, (ranges.x.0, 0.0));
            let b = ranges.to_screen(rect, (ranges.x.1, 0.0));
            painter.line_segment([a, b], Stroke::new(0.5, Color32::from_gray(70)));
        }

        for s in series {
            let points: Vec<Pos2> = s.points.iter().map(|&p| ranges.to_screen(rect, p)).collect();
            match s.style {
                SeriesStyle::Line => {
                    if points.len() > 1 {
                        painter.add(egui::Shape::line(points, Stroke::new(1.5, s.color)));
                    } else {
                        for p in points {
                            painter.circle_filled(p, 2.5, s.color);
                        }
                    }
                }
                SeriesStyle::Dots => {
                    for p in points {
                        painter.circle_filled(p, 2.5, s.color);
                    }
                }
            }
        }

        let font = FontId::proportional(10.0);
        for i in 0..=4 {
            let t = i as f64 / 4.0;
            let x_val = ranges.x.0 + (ranges.x.1 - ranges.x.0) * t;
            let y_val = ranges.y.0 + (ranges.y.1 - ranges.y.0) * t;

            let x_pos = ranges.to_screen(rect, (x_val, ranges.y.0));
            painter.text(
                Pos2::new(x_pos.x, rect.max.y + 3.0),
                Align2::CENTER_TOP,
                tick_label(x_val),
                font.clone(),
                AXIS_COLOR,
            );
            let y_pos = ranges.to_screen(rect, (ranges.x.0, y_val));
            painter.text(
                Pos2::new(rect.min.x - 4.0, y_pos.y),
                Align2::RIGHT_CENTER,
                tick_label(y_val),
                font.clone(),
                AXIS_COLOR,
            );
        }

        painter.text(
            Pos2::new(rect.right() - 4.0, rect.top() + 4.0),
            Align2::RIGHT_TOP,
            format!("{} vs {}", y_label, x_label),
            FontId::proportional(12.0),
            Color32::LIGHT_GRAY,
        );
    });
}

fn tick_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && magnitude < 0.01 {
        format!("{:.0e}", value)
    } else if magnitude >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(10.0, 20.0), egui::Vec2::new(100.0, 50.0))
    }

    #[test]
    fn test_to_screen_maps_corners() {
        let ranges = PlotRanges { x: (100.0, 600.0), y: (0.0, 10.0) };
        assert_eq!(ranges.to_screen(rect(), (100.0, 0.0)), Pos2::new(10.0, 70.0));
        assert_eq!(ranges.to_screen(rect(), (600.0, 10.0)), Pos2::new(110.0, 20.0));
        assert_eq!(ranges.to_screen(rect(), (350.0, 5.0)), Pos2::new(60.0, 45.0));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let ranges = PlotRanges { x: (0.0, 1.0), y: (0.0, 1.0) };
        assert_eq!(ranges.to_screen(rect(), (-5.0, 7.0)), Pos2::new(10.0, 20.0));
    }

    #[test]
    fn test_degenerate_range_centres() {
        let ranges = PlotRanges { x: (1.0, 1.0), y: (0.0, 1.0) };
        assert_eq!(ranges.to_screen(rect(), (1.0, 0.0)).x, 60.0);
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(tick_label(0.0), "0.00");
        assert_eq!(tick_label(2.75), "2.75");
        assert_eq!(tick_label(600.0), "600");
        assert_eq!(tick_label(-2e-3), "-2e-3");
    }

    #[test]
    fn test_every_tab_has_a_label() {
        let labels: Vec<_> = ChartTab::ALL.iter().map(ChartTab::label).collect();
        assert_eq!(labels.len(), 6);
        assert!(labels.iter().all(|l| !l.is_empty()));
    }
}
