use crate::error::AppError;
use runtime::applier::{ApplyOutcome, InitOutcome};
use runtime::error::Report;

/// Identifiers for every mountable component.
///
/// Mount/umount, focus, and subscriptions are all keyed by these ids, so a
/// component can only ever be mounted once.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub enum ComponentId {
    ErrorPopup,
    GlobalKeyWatcher,
    Preview,
    StatusBar,
    ThemeMenu,
    ThemeSelect,
    WarningPopup,
}

/// Top-level messages routed through the tuirealm update loop.
///
/// Components translate raw terminal events into these; the model's update
/// handlers own all state transitions. Background work (runtime applies,
/// init) re-enters the loop through the same enum via the main channel.
#[derive(Debug, PartialEq)]
pub enum Msg {
    AppClose,
    ForceRedraw,
    ThemeActivity(ThemeActivityMsg),
    LoadingActivity(LoadingActivityMsg),
    PopupActivity(PopupActivityMsg),
    Error(AppError),
}

/// Everything that moves the theme selection state machine.
#[derive(Debug, PartialEq)]
pub enum ThemeActivityMsg {
    /// Toggle the dropdown menu. Keyboard activation asks for the first row
    /// to be focused; pointer activation opens without a focused row.
    MenuToggleRequested { focus_first: bool },
    /// The menu closed without choosing. `refocus` moves focus back to the
    /// select for keyboard dismissals; outside clicks leave focus alone.
    MenuClosed { refocus: bool },
    /// Move focus to the theme select control.
    SelectFocusRequested,
    /// The select's option list unrolled.
    SelectOpened,
    /// The select's option list rolled back up without a choice.
    SelectClosed,
    /// A theme id was chosen from either control.
    ThemeChosen(String),
    /// Startup sequencing finished in the background.
    InitCompleted(InitOutcome),
    /// A select/apply call finished in the background.
    ApplyCompleted(ApplyOutcome),
    /// The runtime pushed a report over its channel.
    RuntimeReport(Report),
}

/// Spinner control for long-running background work.
#[derive(Debug, PartialEq)]
pub enum LoadingActivityMsg {
    Start(String),
    Stop,
}

/// Popup lifecycle messages.
#[derive(Debug, PartialEq)]
pub enum PopupActivityMsg {
    ShowError(AppError),
    ShowWarning(String),
    Close,
}
