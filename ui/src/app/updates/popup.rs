use crate::app::model::Model;
use crate::components::common::{Msg, PopupActivityMsg};
use tuirealm::terminal::TerminalAdapter;

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    pub fn update_popup(&mut self, msg: PopupActivityMsg) -> Option<Msg> {
        match msg {
            // Mount failures here only log; reporting them would try to
            // mount the same popup again.
            PopupActivityMsg::ShowError(error) => {
                log::error!("Showing error popup: {error}");
                if let Err(e) = self.mount_error_popup(&error) {
                    log::error!("Failed to mount error popup: {e}");
                }
                None
            }
            PopupActivityMsg::ShowWarning(message) => {
                log::warn!("Showing warning popup: {message}");
                if let Err(e) = self.mount_warning_popup(&message) {
                    log::error!("Failed to mount warning popup: {e}");
                }
                None
            }
            PopupActivityMsg::Close => {
                self.close_popups();
                self.refocus_for_state();
                None
            }
        }
    }
}
