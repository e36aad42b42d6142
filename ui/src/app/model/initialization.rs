use super::{AppState, Model};
use crate::app::remount::preview_copy;
use crate::app::task_manager::TaskManager;
use crate::components::common::{ComponentId, Msg};
use crate::components::global_key_watcher::GlobalKeyWatcher;
use crate::components::preview::Preview;
use crate::components::state::ComponentStateMount;
use crate::components::status_bar::StatusBar;
use crate::components::theme_select::ThemeSelect;
use crate::config;
use crate::error::{AppError, AppResult, ErrorReporter};
use runtime::applier::ThemeRuntime;
use runtime::error::Report;
use runtime::taskpool::TaskPool;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use tuirealm::event::NoUserEvent;
use tuirealm::terminal::{CrosstermTerminalAdapter, TerminalAdapter, TerminalBridge};
use tuirealm::{Application, EventListenerCfg, Sub, SubClause, SubEventClause};

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    fn init_app(
        theme_runtime: &ThemeRuntime,
    ) -> AppResult<Application<ComponentId, Msg, NoUserEvent>> {
        let config = config::get_config_or_panic();
        let mut app: Application<ComponentId, Msg, NoUserEvent> = Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(
                    config.crossterm_input_listener_interval(),
                    config.crossterm_input_listener_retries(),
                )
                .poll_timeout(config.poll_timeout())
                .tick_interval(config.tick_interval()),
        );

        // StatusBar is never focused, so it takes ticks and clicks through a
        // subscription.
        let surfaces = theme_runtime.surfaces_snapshot();
        app.mount_with_state(
            ComponentId::StatusBar,
            StatusBar::new(
                &surfaces.trigger.icon,
                &surfaces.trigger.label,
                false,
                None,
                None,
            ),
            vec![Sub::new(SubEventClause::Any, SubClause::Always)],
        )?;

        let (heading, detail) = preview_copy(theme_runtime);
        app.mount(
            ComponentId::Preview,
            Box::new(Preview::new(heading, detail)),
            Vec::default(),
        )
        .map_err(|e| AppError::Component(e.to_string()))?;

        // Disabled until init hands over the resolved catalog position.
        app.mount(
            ComponentId::ThemeSelect,
            Box::new(ThemeSelect::placeholder()),
            Vec::default(),
        )
        .map_err(|e| AppError::Component(e.to_string()))?;

        app.mount(
            ComponentId::GlobalKeyWatcher,
            Box::new(GlobalKeyWatcher::default()),
            vec![Sub::new(SubEventClause::Any, SubClause::Always)],
        )
        .map_err(|e| AppError::Component(e.to_string()))?;

        app.active(&ComponentId::ThemeSelect)
            .map_err(|e| AppError::Component(e.to_string()))?;

        Ok(app)
    }
}

impl Model<CrosstermTerminalAdapter> {
    pub fn new(theme_runtime: Arc<ThemeRuntime>, rx_reports: Receiver<Report>) -> AppResult<Self> {
        let config = config::get_config_or_panic();

        let (tx_to_main, rx_to_main) = mpsc::channel();
        let taskpool = Arc::new(TaskPool::new(config.max_concurrent_tasks()));

        let error_reporter = ErrorReporter::new(tx_to_main.clone());
        let task_manager = TaskManager::new(
            Arc::clone(&taskpool),
            tx_to_main.clone(),
            error_reporter.clone(),
        );

        Ok(Self {
            app: Self::init_app(&theme_runtime)?,
            app_state: AppState::Browsing,
            quit: false,
            redraw: true,
            terminal: TerminalBridge::init_crossterm()
                .map_err(|e| AppError::Component(e.to_string()))?,
            taskpool,
            tx_to_main,
            rx_to_main,
            rx_reports,
            theme_runtime,
            select_open: false,
            active_loads: 0,
            busy_message: None,
            notice: None,
            error_reporter,
            task_manager,
        })
    }
}
