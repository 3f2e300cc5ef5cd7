//! Equations sidebar UI
//!
//! egui side panel listing the photoelectric relations and their symbols,
//! plus the live values for the current parameters.

use egui::{Color32, Context, FontFamily, FontId, RichText};

use crate::materials::TargetMaterial;
use crate::model::PhotoelectricModel;
use crate::params::SimulationParameters;

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const PHOTOELECTRIC_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Photon Energy",
        formula: "E = hf = hc/λ",
        description: "Energy carried by one photon",
    },
    Equation {
        name: "Einstein Relation",
        formula: "KEmax = hf - φ",
        description: "Excess photon energy goes to the electron",
    },
    Equation {
        name: "Threshold Wavelength",
        formula: "λ₀ = hc/φ",
        description: "Longer wavelengths eject nothing",
    },
    Equation {
        name: "Photocurrent",
        formula: "I ∝ P·λ·e/(hc)",
        description: "Current scales with photon flux, not photon energy",
    },
];

pub const PHOTOELECTRIC_VARIABLES: &[(&str, &str)] = &[
    ("h", "Planck constant"),
    ("c", "Speed of light"),
    ("f", "Light frequency"),
    ("λ", "Wavelength"),
    ("φ", "Work function of the target"),
    ("KEmax", "Maximum electron kinetic energy"),
    ("P", "Incident optical power"),
    ("I", "Photocurrent"),
];

/// Draw a styled equation sidebar with a live-values block for `params`
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
    params: &SimulationParameters,
) {
    egui::SidePanel::right("equations_panel")
        .min_width(280.0)
        .max_width(350.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(title).color(Color32::from_rgb(100, 200, 255)));
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Equations").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for eq in equations {
                draw_equation(ui, eq);
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Variables").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for (symbol, meaning) in variables {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(*symbol)
                            .color(Color32::from_rgb(150, 255, 150))
                            .font(FontId::new(14.0, FontFamily::Monospace)),
                    );
                    ui.label(RichText::new("=").color(Color32::GRAY));
                    ui.label(RichText::new(*meaning).color(Color32::LIGHT_GRAY));
                });
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Current Values").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);
            for line in live_values(params) {
                ui.label(
                    RichText::new(line)
                        .font(FontId::new(13.0, FontFamily::Monospace))
                        .color(Color32::from_rgb(200, 220, 255)),
                );
            }

            ui.add_space(10.0);
            ui.label(RichText::new("Work functions").strong().color(Color32::from_rgb(255, 200, 100)));
            for material in TargetMaterial::ALL {
                let text = format!("{:<9} φ = {:.2} eV", material.name(), material.work_function_ev());
                let color = if material == params.material() {
                    Color32::WHITE
                } else {
                    Color32::GRAY
                };
                ui.label(RichText::new(text).font(FontId::new(13.0, FontFamily::Monospace)).color(color));
            }
        });
}

/// Formatted readings for the live-values block
pub fn live_values(params: &SimulationParameters) -> Vec<String> {
    let wavelength = params.wavelength_nm();
    let material = params.material();
    let photon = PhotoelectricModel::photon_energy_ev(wavelength);
    let threshold = PhotoelectricModel::threshold_wavelength_nm(material.work_function_ev());

    vec![
        format!("λ  = {} nm", wavelength),
        format!("f  = {:.1} THz", PhotoelectricModel::frequency_thz(wavelength)),
        format!("hf = {:.3} eV", photon),
        format!("φ  = {:.2} eV ({})", material.work_function_ev(), material),
        format!("λ₀ = {:.0} nm", threshold),
        if photon > material.work_function_ev() {
            "above threshold".to_string()
        } else {
            "below threshold".to_string()
        },
    ]
}

fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255)),
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_values_report_threshold() {
        let below = SimulationParameters::new(600, 50, TargetMaterial::Platinum);
        assert_eq!(live_values(&below).last().map(String::as_str), Some("below threshold"));

        let above = SimulationParameters::new(200, 50, TargetMaterial::Sodium);
        let lines = live_values(&above);
        assert_eq!(lines[0], "λ  = 200 nm");
        assert_eq!(lines.last().map(String::as_str), Some("above threshold"));
    }
}
