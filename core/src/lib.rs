pub mod identity;
pub mod input;
pub mod model;
pub mod notice;
pub mod repository;
pub mod service;
pub mod settings;
pub mod time;
pub mod usecase;

pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use input::{format_money, parse_price};
pub use model::config::Config;
pub use model::month::YearMonth;
pub use model::record::{Decision, PriceHistory, RecordCollection, RecordState};
pub use model::summary::{DayEntry, MonthlyHistory, MonthlySummary};
pub use model::user::User;
pub use notice::{failure_message, Action};
pub use repository::{DocumentStore, FileDocumentStore, MemoryDocumentStore, StorePath};
pub use service::aggregator::{aggregate, monthly_history};
pub use service::decision::commit_decision;
pub use service::resolver::resolve;
pub use settings::Settings;
pub use time::{format_day, parse_day, today};
pub use usecase::session::{view, MarmitaService, Session, Stage, View};
