// Status bar component
//
// Key hints for the current context. Narrow terminals get the short form.

use crate::console::ViewState;
use crate::router::Route;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Below this width only the view-specific hints are shown
const COMPACT_WIDTH: u16 = 100;

fn view_hints(app: &App) -> &'static str {
    if app.console.overlay().is_visible() {
        return "y copy URI │ p save PNG │ s save SVG │ Esc close";
    }
    match app.console.view() {
        ViewState::SignedOut => "Tab next field │ Enter sign in │ Esc quit",
        ViewState::Failed { .. } => "r retry",
        ViewState::Loading(_) => "loading…",
        ViewState::Ready(_) => match app.console.route() {
            Route::Dashboard => "r refresh",
            Route::Nodes => {
                "j/k select │ a add │ c copy URI │ Enter code │ t toggle │ R reset │ d delete │ T new token │ u copy sub"
            }
            Route::Logs => "j/k scroll │ PgUp/PgDn │ g/G top/bottom │ r refresh",
            Route::Settings if app.settings_editing => "type to edit │ Enter/Esc done",
            Route::Settings => {
                "j/k field │ Enter edit │ Space toggle │ s save │ C rotate cert │ P password"
            }
        },
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let hints = view_hints(app);
    let text = if area.width < COMPACT_WIDTH {
        format!(" {}", hints)
    } else {
        format!(" {} │ 1-4 views │ L console log │ o sign out │ q quit", hints)
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
