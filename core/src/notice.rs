/// User actions that can fail and need a visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Logout,
    LoadConfig,
    SavePrice,
    LoadRecords,
    Decide,
}

pub fn failure_message(action: Action) -> &'static str {
    match action {
        Action::Login => "Could not log in. Try again.",
        Action::Logout => "Could not log out. Try again.",
        Action::LoadConfig => "Could not load your settings. Try again.",
        Action::SavePrice => "Could not save the price. Try again.",
        Action::LoadRecords => "Could not load your records. Try again.",
        Action::Decide => "Could not save today's answer. Try again.",
    }
}
