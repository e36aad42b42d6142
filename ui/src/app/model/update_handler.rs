use super::Model;
use crate::components::common::{Msg, PopupActivityMsg};
use tuirealm::terminal::TerminalAdapter;

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    /// Central message dispatch. Every message implies something on screen
    /// changed, so redraw is set unconditionally.
    pub(super) fn handle_update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        let msg = msg?;
        self.redraw = true;

        let result = match msg {
            Msg::AppClose => {
                self.shutdown();
                None
            }
            Msg::ThemeActivity(activity) => self.update_theme(activity),
            Msg::LoadingActivity(activity) => self.update_loading(activity),
            Msg::PopupActivity(activity) => self.update_popup(activity),
            Msg::Error(e) => self.update_popup(PopupActivityMsg::ShowError(e)),
            Msg::ForceRedraw => None,
        };

        // Errors surfaced by an update chain end in the popup rather than
        // bouncing through the loop again.
        if let Some(Msg::Error(e)) = result {
            log::error!("Update chain failed: {e}");
            if let Err(popup_error) = self.mount_error_popup(&e) {
                log::error!("Failed to mount error popup: {popup_error}");
            }
            return None;
        }

        result
    }
}
