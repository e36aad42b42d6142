use crate::components::common::{LoadingActivityMsg, Msg};
use crate::error::{AppError, ErrorReporter};
use runtime::taskpool::TaskPool;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Guard timeout for any single background operation. Palette loads enforce
/// their own, shorter deadline inside the runtime; this one only catches
/// work that hangs some other way.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs async work on the shared pool with a loading indicator around it.
///
/// Every operation gets the same treatment: a `LoadingActivity::Start` before
/// it runs, a `Stop` when it finishes either way, and an error report instead
/// of a panic when it fails. The spinner therefore always winds down, even
/// for operations that time out.
#[derive(Clone)]
pub struct TaskManager {
    taskpool: Arc<TaskPool>,
    tx_to_main: Sender<Msg>,
    error_reporter: ErrorReporter,
}

impl TaskManager {
    pub fn new(
        taskpool: Arc<TaskPool>,
        tx_to_main: Sender<Msg>,
        error_reporter: ErrorReporter,
    ) -> Self {
        Self {
            taskpool,
            tx_to_main,
            error_reporter,
        }
    }

    /// Execute an async operation with a loading indicator and a guard
    /// timeout.
    pub fn execute<F, R>(&self, loading_message: impl Display, operation: F)
    where
        F: Future<Output = Result<R, AppError>> + Send + 'static,
        R: Send + 'static,
    {
        Self::send_message_or_report_error(
            &self.tx_to_main,
            Msg::LoadingActivity(LoadingActivityMsg::Start(loading_message.to_string())),
            "loading start",
            &self.error_reporter,
        );

        let tx_to_main = self.tx_to_main.clone();
        let error_reporter = self.error_reporter.clone();

        self.taskpool.execute(async move {
            let result = tokio::time::timeout(OPERATION_TIMEOUT, operation).await;

            let final_result = match result {
                Ok(operation_result) => operation_result,
                Err(_) => {
                    log::warn!("Operation timed out after {OPERATION_TIMEOUT:?}");
                    Err(AppError::Component(format!(
                        "Operation timed out after {} seconds",
                        OPERATION_TIMEOUT.as_secs()
                    )))
                }
            };

            Self::send_message_or_report_error(
                &tx_to_main,
                Msg::LoadingActivity(LoadingActivityMsg::Stop),
                "loading stop",
                &error_reporter,
            );

            if let Err(error) = final_result {
                error_reporter.report_simple(error, "TaskManager", "async_operation");
            }
        });
    }

    /// Send a message to the main thread, reporting instead of panicking
    /// when the channel is gone.
    pub fn send_message_or_report_error(
        tx: &Sender<Msg>,
        msg: Msg,
        context: &str,
        error_reporter: &ErrorReporter,
    ) {
        if let Err(e) = tx.send(msg) {
            error_reporter.report_send_error(context, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::common::PopupActivityMsg;
    use claims::*;
    use std::sync::mpsc;
    use tokio::time::sleep;

    mod helpers {
        use super::*;

        pub fn create_test_setup() -> (TaskManager, mpsc::Receiver<Msg>) {
            let taskpool = Arc::new(TaskPool::new(4));
            let (tx, rx) = mpsc::channel();
            let error_reporter = ErrorReporter::new(tx.clone());
            let task_manager = TaskManager::new(taskpool, tx, error_reporter);
            (task_manager, rx)
        }

        pub fn collect_messages_with_timeout(
            rx: &mpsc::Receiver<Msg>,
            expected_count: usize,
            timeout_ms: u64,
        ) -> Vec<Msg> {
            let mut messages = Vec::new();
            let start = std::time::Instant::now();

            while messages.len() < expected_count
                && start.elapsed().as_millis() < timeout_ms as u128
            {
                match rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(msg) => messages.push(msg),
                    Err(mpsc::RecvTimeoutError::Timeout) => continue,
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }

            messages
        }

        pub fn assert_start_message(msg: &Msg, expected_text: &str) {
            assert_matches!(msg,
                Msg::LoadingActivity(LoadingActivityMsg::Start(text))
                if text == expected_text
            );
        }

        pub fn assert_stop_message(msg: &Msg) {
            assert_matches!(msg, Msg::LoadingActivity(LoadingActivityMsg::Stop));
        }
    }

    mod unit {
        use super::*;
        use helpers::*;

        #[test]
        fn task_manager_is_cheap_to_clone() {
            let (task_manager, _rx) = create_test_setup();
            let _clone = task_manager.clone();
        }

        #[tokio::test]
        async fn execute_sends_start_message() {
            let (task_manager, rx) = create_test_setup();

            task_manager.execute("Test Message", async move { Ok::<(), AppError>(()) });

            let messages = collect_messages_with_timeout(&rx, 1, 1000);
            assert_ge!(messages.len(), 1, "Should receive at least start message");
            assert_start_message(&messages[0], "Test Message");
        }

        #[tokio::test]
        async fn execute_sends_stop_message_on_success() {
            let (task_manager, rx) = create_test_setup();

            task_manager.execute("Test", async move {
                sleep(Duration::from_millis(10)).await;
                Ok::<(), AppError>(())
            });

            sleep(Duration::from_millis(100)).await;
            let messages = collect_messages_with_timeout(&rx, 2, 1000);

            assert_ge!(messages.len(), 2, "Should receive start and stop messages");
            assert_start_message(&messages[0], "Test");
            assert_stop_message(&messages[1]);
        }

        #[tokio::test]
        async fn failed_operation_still_stops_and_reports() {
            let (task_manager, rx) = create_test_setup();

            task_manager.execute("Test", async move {
                Err::<(), AppError>(AppError::Config("test error".to_string()))
            });

            sleep(Duration::from_millis(100)).await;
            let messages = collect_messages_with_timeout(&rx, 3, 1000);

            assert_ge!(messages.len(), 3);
            assert_start_message(&messages[0], "Test");
            assert_stop_message(&messages[1]);
            assert_matches!(
                &messages[2],
                Msg::PopupActivity(PopupActivityMsg::ShowError(AppError::Config(text)))
                if text.contains("test error")
            );
        }

        #[tokio::test]
        async fn operations_run_concurrently_up_to_the_pool_limit() {
            let (task_manager, rx) = create_test_setup();

            for i in 0..3 {
                task_manager.execute(format!("op-{i}"), async move {
                    sleep(Duration::from_millis(20)).await;
                    Ok::<(), AppError>(())
                });
            }

            sleep(Duration::from_millis(200)).await;
            let messages = collect_messages_with_timeout(&rx, 6, 1000);

            let starts = messages
                .iter()
                .filter(|m| matches!(m, Msg::LoadingActivity(LoadingActivityMsg::Start(_))))
                .count();
            let stops = messages
                .iter()
                .filter(|m| matches!(m, Msg::LoadingActivity(LoadingActivityMsg::Stop)))
                .count();
            assert_eq!(starts, 3);
            assert_eq!(stops, 3);
        }

        #[tokio::test]
        async fn dropped_receiver_does_not_panic() {
            let (task_manager, rx) = create_test_setup();
            drop(rx);

            task_manager.execute("Test", async move { Ok::<(), AppError>(()) });
            sleep(Duration::from_millis(50)).await;
        }
    }
}
