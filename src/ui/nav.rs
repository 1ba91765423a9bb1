//! In-memory navigation between screens.

use crate::session::SearchSession;
use crate::ui::detail::DetailView;

/// Where the UI goes next, with the state handed over to that screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    /// `None` means "restore from the session cache".
    Results(Option<SearchSession>),
    Detail(Box<DetailView>),
}
