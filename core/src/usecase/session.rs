use crate::identity::IdentityProvider;
use crate::input::validate_price;
use crate::model::config::Config;
use crate::model::month::YearMonth;
use crate::model::record::{Decision, RecordCollection, RecordState};
use crate::model::summary::{MonthlyHistory, MonthlySummary};
use crate::model::user::User;
use crate::repository::{ConfigRepository, DocumentStore, RecordRepository, SubscriptionId};
use crate::service::aggregator::{aggregate, monthly_history};
use crate::service::decision::commit_decision;
use crate::service::resolver::resolve;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Signed in, but no unit price configured yet.
    NeedsPrice,
    Ready,
}

/// Everything the front end knows about the signed-in user.
/// Owned by the caller and handed to every intent on `MarmitaService`.
pub struct Session {
    pub user: User,
    pub config: Option<Config>,
    pub records: RecordCollection,
    pub day: NaiveDate,
    pub month: YearMonth,
    updates: Option<Receiver<RecordCollection>>,
    subscription: Option<SubscriptionId>,
}

impl Session {
    pub fn new(user: User, today: NaiveDate) -> Self {
        Self {
            user,
            config: None,
            records: RecordCollection::new(),
            day: today,
            month: YearMonth::of(today),
            updates: None,
            subscription: None,
        }
    }

    pub fn stage(&self) -> Stage {
        match &self.config {
            Some(config) if config.is_configured() => Stage::Ready,
            _ => Stage::NeedsPrice,
        }
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.config.as_ref().filter(|c| c.is_configured()).map(|c| c.unit_price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub stage: Stage,
    pub display_name: String,
    pub day: NaiveDate,
    pub state: RecordState,
    pub month: YearMonth,
    pub summary: MonthlySummary,
    pub unit_price: Option<f64>,
}

pub fn view(session: &Session) -> View {
    let summary = match &session.config {
        Some(config) if config.is_configured() => aggregate(
            &session.records,
            &config.price_history,
            config.unit_price,
            session.month,
        ),
        _ => MonthlySummary::default(),
    };

    View {
        stage: session.stage(),
        display_name: session.user.display_name.clone(),
        day: session.day,
        state: resolve(&session.records, session.day),
        month: session.month,
        summary,
        unit_price: session.unit_price(),
    }
}

pub struct MarmitaService<S: DocumentStore, I: IdentityProvider> {
    store: S,
    identity: I,
}

impl<S: DocumentStore, I: IdentityProvider> MarmitaService<S, I> {
    pub fn new(store: S, identity: I) -> Self {
        Self { store, identity }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn login(&self, display_name: &str, today: NaiveDate) -> Result<Session> {
        let user = self.identity.sign_in(display_name)?;
        self.open(user, today)
    }

    /// Picks up a sign-in left over from an earlier run.
    pub fn restore(&self, today: NaiveDate) -> Result<Option<Session>> {
        match self.identity.current()? {
            Some(user) => Ok(Some(self.open(user, today)?)),
            None => Ok(None),
        }
    }

    fn open(&self, user: User, today: NaiveDate) -> Result<Session> {
        let mut session = Session::new(user, today);
        session.config = ConfigRepository::new(&self.store).load(&session.user.uid)?;
        if session.stage() == Stage::Ready {
            self.watch_records(&mut session)?;
        }
        info!(uid = %session.user.uid, stage = ?session.stage(), "Session opened");
        Ok(session)
    }

    fn watch_records(&self, session: &mut Session) -> Result<()> {
        if session.subscription.is_some() {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel();
        let id = RecordRepository::new(&self.store).watch(&session.user.uid, tx)?;
        session.subscription = Some(id);
        session.updates = Some(rx);
        self.refresh(session);
        Ok(())
    }

    pub fn logout(&self, session: Session) -> Result<()> {
        if let Some(id) = session.subscription {
            self.store.unsubscribe(id);
        }
        self.identity.sign_out()
    }

    pub fn set_price(&self, session: &mut Session, price: f64) -> Result<()> {
        validate_price(price)?;
        ConfigRepository::new(&self.store).save_price(&session.user.uid, price)?;

        let config = session.config.get_or_insert_with(Config::default);
        config.unit_price = price;
        info!(uid = %session.user.uid, price, "Unit price saved");

        self.watch_records(session)
    }

    /// Records the decision for the selected day.
    pub fn decide(&self, session: &mut Session, decision: Decision) -> Result<RecordState> {
        let price = session
            .unit_price()
            .ok_or_else(|| anyhow!("Set a unit price before answering"))?;
        let uid = session.user.uid.clone();
        let day = session.day;

        RecordRepository::new(&self.store).save(&uid, day, decision)?;
        if decision == Decision::Yes {
            ConfigRepository::new(&self.store).save_snapshot(&uid, day, price)?;
        }

        if let Some(config) = session.config.as_mut() {
            commit_decision(&mut session.records, &mut config.price_history, day, decision, price);
        }
        info!(uid = %uid, %day, ?decision, "Decision recorded");

        self.refresh(session);
        Ok(resolve(&session.records, day))
    }

    pub fn select_month(&self, session: &mut Session, month: YearMonth) {
        session.month = month;
    }

    pub fn select_day(&self, session: &mut Session, day: NaiveDate) {
        session.day = day;
    }

    /// Moves the session to `today` once the calendar day changes. The month
    /// follows along unless the user is browsing a different one.
    /// Returns true when the day moved.
    pub fn roll_day(&self, session: &mut Session, today: NaiveDate) -> bool {
        if session.day == today {
            return false;
        }
        if session.month == YearMonth::of(session.day) {
            session.month = YearMonth::of(today);
        }
        session.day = today;
        true
    }

    /// Applies pending store notifications. Returns true when the records changed.
    pub fn refresh(&self, session: &mut Session) -> bool {
        let Some(rx) = session.updates.as_ref() else {
            return false;
        };
        match rx.try_iter().last() {
            Some(records) if records != session.records => {
                session.records = records;
                true
            }
            _ => false,
        }
    }

    pub fn history(&self, session: &Session) -> Vec<MonthlyHistory> {
        match &session.config {
            Some(config) => monthly_history(&session.records, &config.price_history, config.unit_price),
            None => Vec::new(),
        }
    }
}
