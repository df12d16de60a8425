//! Comprehensive tests for the lifecycle state machine.

#[cfg(test)]
mod tests {
    use crate::errors::TraceflowError;
    use crate::extension::{ExtensionState, LifecycleDriver};
    use crate::session::{Configuration, ExecutionSession, SearchPathResolver};
    use crate::testing::RecordingExtension;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn session() -> ExecutionSession {
        ExecutionSession::new(
            Arc::new(Configuration::new()),
            Arc::new(SearchPathResolver::default()),
        )
    }

    fn started_driver() -> (LifecycleDriver, Arc<RecordingExtension>) {
        let extension = Arc::new(RecordingExtension::new());
        let driver = LifecycleDriver::new(extension.clone());
        driver.startup().unwrap();
        (driver, extension)
    }

    #[test]
    fn test_startup_transitions_to_started() {
        let (driver, extension) = started_driver();

        assert_eq!(driver.state(), ExtensionState::Started);
        assert_eq!(extension.calls(), vec!["startup"]);
    }

    #[test]
    fn test_startup_called_twice() {
        let (driver, _) = started_driver();

        let err = driver.startup().unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
        assert_eq!(driver.state(), ExtensionState::Started);
    }

    #[test]
    fn test_begin_before_startup() {
        let driver = LifecycleDriver::new(Arc::new(RecordingExtension::new()));

        let err = driver.begin_execution(&session()).unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
        assert_eq!(driver.state(), ExtensionState::Uninitialized);
    }

    #[test]
    fn test_full_run_cycle() {
        let (driver, extension) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        assert_eq!(driver.state(), ExtensionState::Executing);

        driver.suspend_execution(&s).unwrap();
        assert_eq!(driver.state(), ExtensionState::Suspended);

        driver.resume_execution(&s).unwrap();
        assert_eq!(driver.state(), ExtensionState::Executing);

        driver.end_execution(&s).unwrap();
        assert_eq!(driver.state(), ExtensionState::AwaitingExecution);

        let calls = extension.calls();
        let phases: Vec<&str> = calls
            .iter()
            .map(|c| c.split(':').next().unwrap())
            .collect();
        assert_eq!(phases, vec!["startup", "begin", "suspend", "resume", "end"]);
    }

    #[test]
    fn test_double_suspend_rejected() {
        let (driver, _) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        driver.suspend_execution(&s).unwrap();

        let err = driver.suspend_execution(&s).unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
        assert_eq!(driver.state(), ExtensionState::Suspended);
    }

    #[test]
    fn test_resume_without_suspend_rejected() {
        let (driver, _) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        let err = driver.resume_execution(&s).unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
    }

    #[test]
    fn test_suspend_resume_repeats_within_one_run() {
        let (driver, _) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        for _ in 0..3 {
            driver.suspend_execution(&s).unwrap();
            driver.resume_execution(&s).unwrap();
        }
        driver.end_execution(&s).unwrap();
    }

    #[test]
    fn test_sessions_are_not_reentrant() {
        let (driver, _) = started_driver();
        let first = session();

        driver.begin_execution(&first).unwrap();
        let err = driver.begin_execution(&session()).unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
    }

    #[test]
    fn test_end_with_mismatched_session_rejected() {
        let (driver, extension) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        extension.reset();

        let err = driver.end_execution(&session()).unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
        // The extension never saw the bogus end.
        assert_eq!(extension.call_count(), 0);
        assert_eq!(driver.state(), ExtensionState::Executing);
    }

    #[test]
    fn test_begin_end_pairing_across_runs() {
        let (driver, extension) = started_driver();

        let first = session();
        driver.begin_execution(&first).unwrap();
        driver.end_execution(&first).unwrap();

        let second = session();
        driver.begin_execution(&second).unwrap();
        driver.end_execution(&second).unwrap();

        let calls = extension.calls();
        assert_eq!(calls[1], format!("begin:{}", first.run_id()));
        assert_eq!(calls[2], format!("end:{}", first.run_id()));
        assert_eq!(calls[3], format!("begin:{}", second.run_id()));
        assert_eq!(calls[4], format!("end:{}", second.run_id()));
    }

    #[test]
    fn test_rebound_session_is_the_same_run() {
        let (driver, _) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        driver.suspend_execution(&s).unwrap();

        let rebound = s.rebind();
        driver.resume_execution(&rebound).unwrap();
        driver.end_execution(&rebound).unwrap();
        assert_eq!(driver.state(), ExtensionState::AwaitingExecution);
    }

    #[test]
    fn test_end_from_suspended_releases_run() {
        let (driver, extension) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        driver.suspend_execution(&s).unwrap();
        driver.end_execution(&s).unwrap();

        assert_eq!(driver.state(), ExtensionState::AwaitingExecution);
        assert!(extension.calls().last().unwrap().starts_with("end:"));
    }

    #[test]
    fn test_shutdown_is_terminal() {
        let (driver, extension) = started_driver();
        driver.shutdown().unwrap();

        assert_eq!(driver.state(), ExtensionState::Shutdown);
        assert_eq!(extension.calls(), vec!["startup", "shutdown"]);

        for err in [
            driver.startup().unwrap_err(),
            driver.begin_execution(&session()).unwrap_err(),
            driver.shutdown().unwrap_err(),
        ] {
            assert!(matches!(err, TraceflowError::Shutdown(_)));
        }
    }

    #[test]
    fn test_shutdown_during_run_rejected() {
        let (driver, _) = started_driver();
        let s = session();

        driver.begin_execution(&s).unwrap();
        let err = driver.shutdown().unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));

        driver.end_execution(&s).unwrap();
        driver.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_before_startup_rejected() {
        let driver = LifecycleDriver::new(Arc::new(RecordingExtension::new()));
        let err = driver.shutdown().unwrap_err();
        assert!(matches!(err, TraceflowError::LifecycleOrder(_)));
    }

    #[test]
    fn test_rejected_call_skips_extension_callback() {
        let extension = Arc::new(RecordingExtension::new());
        let driver = LifecycleDriver::new(extension.clone());

        let _ = driver.begin_execution(&session());
        let _ = driver.suspend_execution(&session());
        assert_eq!(extension.call_count(), 0);
    }
}
