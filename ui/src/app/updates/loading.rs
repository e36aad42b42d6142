use crate::app::model::Model;
use crate::components::common::{LoadingActivityMsg, Msg};
use tuirealm::terminal::TerminalAdapter;

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    /// Track background work for the status bar spinner.
    ///
    /// Operations overlap (a startup load and a user apply, two quick
    /// applies), so this is a counter, not a flag. The spinner winds down
    /// only when every started operation has stopped; the message shown is
    /// the most recently started one.
    pub fn update_loading(&mut self, msg: LoadingActivityMsg) -> Option<Msg> {
        match msg {
            LoadingActivityMsg::Start(message) => {
                log::debug!("Background work started: {message}");
                self.active_loads += 1;
                self.busy_message = Some(message);
                self.remount_status_bar();
                None
            }
            LoadingActivityMsg::Stop => {
                self.active_loads = self.active_loads.saturating_sub(1);
                if self.active_loads == 0 {
                    log::debug!("Background work drained");
                    self.busy_message = None;
                }
                self.remount_status_bar();
                None
            }
        }
    }
}
