use marmita_core::{
    failure_message, format_money, parse_price, today, view, Action, Decision, MonthlyHistory,
    Session, Stage, View,
};

use crate::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Login,
    Price,
}

pub struct App {
    pub service: Service,
    pub session: Option<Session>,
    pub view: Option<View>,
    pub history: Vec<MonthlyHistory>,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
    pub currency: String,
}

impl App {
    pub fn new(service: Service, currency: String) -> App {
        let mut app = App {
            service,
            session: None,
            view: None,
            history: Vec::new(),
            input: String::new(),
            input_mode: InputMode::Login,
            cursor_position: 0,
            status: None,
            currency,
        };

        match app.service.restore(today()) {
            Ok(Some(session)) => app.attach(session),
            Ok(None) => {}
            Err(e) => app.fail(Action::LoadConfig, e),
        }
        app
    }

    fn attach(&mut self, session: Session) {
        self.input_mode = match session.stage() {
            Stage::NeedsPrice => InputMode::Price,
            Stage::Ready => InputMode::Normal,
        };
        self.session = Some(session);
        self.recompute();
    }

    fn recompute(&mut self) {
        match &self.session {
            Some(session) => {
                self.view = Some(view(session));
                self.history = self.service.history(session);
            }
            None => {
                self.view = None;
                self.history.clear();
            }
        }
    }

    fn fail(&mut self, action: Action, err: anyhow::Error) {
        tracing::error!(?action, error = %format!("{:#}", err), "Action failed");
        self.status = Some(failure_message(action).to_string());
    }

    /// Polls the store subscription and the clock; called on every loop turn.
    pub fn tick(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let rolled = self.service.roll_day(session, today());
            let changed = self.service.refresh(session);
            if rolled || changed {
                self.recompute();
            }
        }
    }

    pub fn answer(&mut self, decision: Decision) {
        let Some(session) = self.session.as_mut() else { return };
        if session.stage() != Stage::Ready {
            return;
        }
        // answers always go to today, even after browsing other months
        self.service.select_day(session, today());
        match self.service.decide(session, decision) {
            Ok(state) => {
                self.status = Some(state.label().to_string());
                self.recompute();
            }
            Err(e) => self.fail(Action::Decide, e),
        }
    }

    pub fn next_month(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let month = session.month.next();
            self.service.select_month(session, month);
            self.recompute();
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let month = session.month.previous();
            self.service.select_month(session, month);
            self.recompute();
        }
    }

    pub fn current_month_history(&self) -> Option<&MonthlyHistory> {
        let month = self.view.as_ref()?.month;
        self.history.iter().find(|h| h.month == month)
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            match self.service.logout(session) {
                Ok(()) => self.status = Some("Logged out.".to_string()),
                Err(e) => self.fail(Action::Logout, e),
            }
        }
        self.recompute();
        self.enter_input_mode(InputMode::Login);
    }

    pub fn enter_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Esc only leaves the price prompt once a price exists.
    pub fn exit_input_mode(&mut self) {
        let ready = self.session.as_ref().map(|s| s.stage() == Stage::Ready).unwrap_or(false);
        if ready {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }

        match self.input_mode {
            InputMode::Login => self.submit_login(),
            InputMode::Price => self.submit_price(),
            InputMode::Normal => {}
        }
    }

    fn submit_login(&mut self) {
        match self.service.login(&self.input, today()) {
            Ok(session) => {
                self.status = Some(format!("Welcome, {}!", session.user.display_name));
                self.input.clear();
                self.cursor_position = 0;
                self.attach(session);
            }
            Err(e) => self.fail(Action::Login, e),
        }
    }

    fn submit_price(&mut self) {
        let price = match parse_price(&self.input) {
            Ok(p) => p,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };
        let Some(session) = self.session.as_mut() else { return };
        match self.service.set_price(session, price) {
            Ok(()) => {
                self.status = Some(format!("Price set to {}", format_money(price, &self.currency)));
                self.enter_input_mode(InputMode::Normal);
                self.recompute();
            }
            Err(e) => self.fail(Action::SavePrice, e),
        }
    }
}
