use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::core::view::message_views;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, NameGate, TitleBar, input_box};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let Some(user) = app.session.user() else {
        tui.name_input.focused = true;
        NameGate::new(&mut tui.name_input).render(frame, frame.area());
        return;
    };

    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(input_box::HEIGHT)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let views = message_views(app);
    MessageList::new(&mut tui.message_list, &views).render(frame, main_area);

    TitleBar {
        user,
        has_unseen_content: tui.message_list.has_unseen_content(),
    }
    .render(frame, title_area);

    tui.composer.focused = true;
    tui.composer.render(frame, input_area);
}
