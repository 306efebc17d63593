mod helpers;
pub mod layout;
pub mod views;

use std::time::{Duration, Instant};

use crate::app::EcoApp;
use crate::model::AppState;
use eframe::{APP_KEY, App, Frame, set_value};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for EcoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Resultados de los hilos del backend
        self.poll_backend();

        // Durante el quiz la cuenta atrás manda: sondeo + repintado corto
        if matches!(self.state, AppState::Quiz) {
            self.tick_quiz(Instant::now());
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // BARRA SUPERIOR (no en login/registro ni durante el quiz)
        if !matches!(
            self.state,
            AppState::Login | AppState::Register | AppState::Quiz
        ) {
            top_panel(self, ctx);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(ctx);

        // Dispatch por estado a las funciones de views
        match self.state {
            AppState::Login => views::login::ui_login(self, ctx),
            AppState::Register => views::register::ui_register(self, ctx),
            AppState::Home => views::home::ui_home(self, ctx),
            AppState::ClassDetail => views::class_detail::ui_class_detail(self, ctx),
            AppState::Material => views::material::ui_material(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx),
            AppState::QuizResult => views::result::ui_quiz_result(self, ctx),
        }

        if self.confirm_submit {
            self.confirmar_entrega(ctx);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, self);
    }
}
