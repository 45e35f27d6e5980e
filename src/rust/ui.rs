//! The prediction form, as a native egui window.

use egui::{Color32, RichText};

use crate::report::{Banner, PREDICTION_SUCCEEDED};
use crate::request::{
    InternshipExperience, PredictionRequest, ACADEMIC_PERFORMANCE_RANGE, CGPA_RANGE,
    COMMUNICATION_SKILLS_RANGE, EXTRA_CURRICULAR_SCORE_RANGE, IQ_RANGE, PREV_SEM_RESULT_RANGE,
    PROJECTS_COMPLETED_RANGE,
};
use crate::service::{PlacementService, Submission};

pub const APP_TITLE: &str = "🎓 College Student Placement Predictor";
const CAPTION: &str =
    "Üniversite öğrencilerinin işe yerleştirilme durumunu tahmin etmek için basit ve modern bir arayüz.";
const SUBMIT_LABEL: &str = "Yerleştirme Durumunu Tahmin Et";

const SUCCESS: Color32 = Color32::from_rgb(0x3d, 0xb8, 0x6b);
const WARNING: Color32 = Color32::from_rgb(0xe8, 0xa3, 0x3d);
const ERROR: Color32 = Color32::from_rgb(0xe0, 0x52, 0x52);
const INFO: Color32 = Color32::from_rgb(0x5a, 0xa9, 0xe6);

fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 620.0])
            .with_min_inner_size([480.0, 420.0])
            .with_title(APP_TITLE),
        ..Default::default()
    }
}

/// Opens the form and blocks until the window is closed.
pub fn run(service: PlacementService) -> Result<(), eframe::Error> {
    eframe::run_native(
        APP_TITLE,
        native_options(),
        Box::new(|_cc| Ok(Box::new(PlacementApp::new(service)))),
    )
}

/// Shows only the blocking error screen; used when the artifact cannot be loaded.
pub fn run_launch_error(message: String) -> Result<(), eframe::Error> {
    eframe::run_native(
        APP_TITLE,
        native_options(),
        Box::new(|_cc| Ok(Box::new(LaunchError { message }))),
    )
}

pub struct PlacementApp {
    service: PlacementService,
    form: PredictionRequest,
    last: Option<Submission>,
}

impl PlacementApp {
    pub fn new(service: PlacementService) -> Self {
        Self {
            service,
            form: PredictionRequest::default(),
            last: None,
        }
    }

    pub fn form_mut(&mut self) -> &mut PredictionRequest {
        &mut self.form
    }

    pub fn last_submission(&self) -> Option<&Submission> {
        self.last.as_ref()
    }

    /// Handles the submit button.
    pub fn submit(&mut self) {
        self.last = Some(self.service.submit(&self.form));
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.heading(APP_TITLE);
        ui.label(RichText::new(CAPTION).weak());
        ui.add_space(8.0);
        ui.label(RichText::new("Öğrenci Bilgileri").strong().size(18.0));
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.form;
        ui.columns(2, |columns| {
            egui::Grid::new("form_left")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(&mut columns[0], |ui| {
                    ui.label("IQ Seviyesi");
                    ui.add(
                        egui::DragValue::new(&mut form.iq)
                            .range(IQ_RANGE.min..=IQ_RANGE.max)
                            .speed(IQ_RANGE.step as f64),
                    );
                    ui.end_row();

                    ui.label("Önceki Dönem Sonucu");
                    ui.add(
                        egui::DragValue::new(&mut form.prev_sem_result)
                            .range(PREV_SEM_RESULT_RANGE.min..=PREV_SEM_RESULT_RANGE.max)
                            .speed(PREV_SEM_RESULT_RANGE.step)
                            .fixed_decimals(1),
                    );
                    ui.end_row();

                    ui.label("CGPA (Genel Not Ortalaması)");
                    ui.add(
                        egui::DragValue::new(&mut form.cgpa)
                            .range(CGPA_RANGE.min..=CGPA_RANGE.max)
                            .speed(CGPA_RANGE.step)
                            .fixed_decimals(1),
                    );
                    ui.end_row();

                    ui.label("Akademik Performans (1-10)");
                    ui.add(
                        egui::DragValue::new(&mut form.academic_performance)
                            .range(ACADEMIC_PERFORMANCE_RANGE.min..=ACADEMIC_PERFORMANCE_RANGE.max)
                            .speed(ACADEMIC_PERFORMANCE_RANGE.step as f64),
                    );
                    ui.end_row();
                });

            egui::Grid::new("form_right")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(&mut columns[1], |ui| {
                    ui.label("Staj Deneyimi");
                    egui::ComboBox::from_id_salt("internship_experience")
                        .selected_text(form.internship_experience.as_str())
                        .show_ui(ui, |ui| {
                            for option in InternshipExperience::ALL {
                                ui.selectable_value(
                                    &mut form.internship_experience,
                                    option,
                                    option.as_str(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Ders Dışı Etkinlik Skoru (1-10)");
                    ui.add(
                        egui::DragValue::new(&mut form.extra_curricular_score)
                            .range(EXTRA_CURRICULAR_SCORE_RANGE.min..=EXTRA_CURRICULAR_SCORE_RANGE.max)
                            .speed(EXTRA_CURRICULAR_SCORE_RANGE.step as f64),
                    );
                    ui.end_row();

                    ui.label("İletişim Becerileri (1-10)");
                    ui.add(
                        egui::DragValue::new(&mut form.communication_skills)
                            .range(COMMUNICATION_SKILLS_RANGE.min..=COMMUNICATION_SKILLS_RANGE.max)
                            .speed(COMMUNICATION_SKILLS_RANGE.step as f64),
                    );
                    ui.end_row();

                    ui.label("Tamamlanan Proje Sayısı");
                    ui.add(
                        egui::DragValue::new(&mut form.projects_completed)
                            .range(PROJECTS_COMPLETED_RANGE.min..=PROJECTS_COMPLETED_RANGE.max)
                            .speed(PROJECTS_COMPLETED_RANGE.step as f64),
                    );
                    ui.end_row();
                });
        });
        ui.add_space(8.0);
        if ui.button(SUBMIT_LABEL).clicked() {
            self.submit();
        }
        ui.add_space(8.0);
    }

    fn render_result(&self, ui: &mut egui::Ui) {
        let Some(submission) = &self.last else {
            return;
        };
        match &submission.result {
            Ok(outcome) => {
                ui.label(RichText::new(PREDICTION_SUCCEEDED).color(SUCCESS));
                let color = match outcome.banner {
                    Banner::Success => SUCCESS,
                    Banner::Warning => WARNING,
                };
                ui.label(RichText::new(outcome.banner_text()).color(color).strong().size(16.0));
                if let Some(line) = &outcome.probability_line {
                    ui.label(RichText::new(line).color(INFO));
                }
                egui::CollapsingHeader::new("Girdi Özeti")
                    .default_open(false)
                    .show(ui, |ui| {
                        egui::Grid::new("input_summary")
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                ui.label("");
                                ui.label(RichText::new("değer").strong());
                                ui.end_row();
                                for (column, value) in submission.row.transposed() {
                                    ui.label(column);
                                    ui.label(value);
                                    ui.end_row();
                                }
                            });
                    });
            }
            Err(report) => {
                ui.label(RichText::new(report.message).color(ERROR));
                egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    ui.monospace(&report.detail);
                });
            }
        }
    }
}

impl eframe::App for PlacementApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(10.0, 8.0);
            self.render_header(ui);
            self.render_form(ui);
            self.render_result(ui);
        });
    }
}

/// Minimal app that only displays why the form could not start.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(APP_TITLE);
            ui.add_space(8.0);
            ui.label(RichText::new(&self.message).color(ERROR).strong());
        });
    }
}
