// tests/event_dispatcher.rs

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fovwatch::callbacks::{FovCallback, RunCallback};
use fovwatch::errors::FovWatchError;
use fovwatch::fs::mock::MockFileSystem;
use fovwatch::progress::RunProgress;
use fovwatch::run::{RunDescriptor, RunLog};
use fovwatch::watch::EventDispatcher;

use fovwatch_test_utils::builders::{fov_ids, seed_mock_run};
use fovwatch_test_utils::recording::{
    CallLog, FailingFovCallback, RecordingFovCallback, RecordingRunCallback,
};
use fovwatch_test_utils::{init_tracing, with_timeout};

const FAST_TIMEOUT: Duration = Duration::from_millis(60);
const FAST_POLL: Duration = Duration::from_millis(10);

struct Session {
    dispatcher: EventDispatcher,
    fov_calls: CallLog,
    run_calls: CallLog,
    // Keeps the log folder alive for the dispatcher's run log.
    log_dir: tempfile::TempDir,
}

fn session(fs: &MockFileSystem, run_folder: &Path, fovs: &[(i64, i64)]) -> Session {
    session_with(fs, run_folder, fovs, Vec::new())
}

fn session_with(
    fs: &MockFileSystem,
    run_folder: &Path,
    fovs: &[(i64, i64)],
    extra_per_fov: Vec<Box<dyn FovCallback>>,
) -> Session {
    seed_mock_run(fs, run_folder, fovs);
    let descriptor = RunDescriptor::parse(fs, run_folder).unwrap();
    let progress = RunProgress::new(&descriptor, FAST_TIMEOUT, FAST_POLL);

    let log_dir = tempfile::tempdir().unwrap();
    let run_log = RunLog::create(log_dir.path(), descriptor.run_name()).unwrap();

    let (fov_cb, fov_calls) = RecordingFovCallback::new("record_fov");
    let (run_cb, run_calls) = RecordingRunCallback::new("record_run");

    let mut per_fov: Vec<Box<dyn FovCallback>> = vec![Box::new(fov_cb)];
    per_fov.extend(extra_per_fov);
    let per_run: Vec<Box<dyn RunCallback>> = vec![Box::new(run_cb)];

    let dispatcher = EventDispatcher::new(
        run_folder.to_path_buf(),
        Arc::new(fs.clone()),
        progress,
        per_fov,
        per_run,
        run_log,
    );

    Session {
        dispatcher,
        fov_calls,
        run_calls,
        log_dir,
    }
}

fn run_log_contents(session: &Session, run_name: &str) -> String {
    fs::read_to_string(session.log_dir.path().join(format!("{run_name}_log.txt"))).unwrap()
}

/// The canonical two-fov session: four creation events, two per-fov
/// dispatches in completion order, one per-run dispatch after the last.
#[tokio::test]
async fn two_fov_run_dispatches_each_fov_once_then_the_run() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1), (2, 1)]);

        for name in [
            "fov-1-scan-1.json",
            "fov-1-scan-1.bin",
            "fov-2-scan-1.json",
        ] {
            fs.add_file(run.join(name), "content");
            s.dispatcher.on_file_created(&run.join(name)).await.unwrap();
        }
        assert_eq!(s.fov_calls.entries(), vec!["fov-1-scan-1"]);
        assert!(s.run_calls.is_empty(), "run callbacks fired before all fovs were ready");

        fs.add_file(run.join("fov-2-scan-1.bin"), "content");
        s.dispatcher
            .on_file_created(&run.join("fov-2-scan-1.bin"))
            .await
            .unwrap();

        assert_eq!(s.fov_calls.entries(), vec!["fov-1-scan-1", "fov-2-scan-1"]);
        assert_eq!(s.run_calls.len(), 1);
    })
    .await
}

#[tokio::test]
async fn duplicate_events_do_not_redispatch() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1)]);

        fs.add_file(run.join("fov-1-scan-1.json"), "content");
        fs.add_file(run.join("fov-1-scan-1.bin"), "content");

        for _ in 0..3 {
            s.dispatcher
                .on_file_created(&run.join("fov-1-scan-1.json"))
                .await
                .unwrap();
            s.dispatcher
                .on_file_created(&run.join("fov-1-scan-1.bin"))
                .await
                .unwrap();
        }

        assert_eq!(s.fov_calls.entries(), vec!["fov-1-scan-1"]);
    })
    .await
}

#[tokio::test]
async fn per_fov_callbacks_wait_for_both_files() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1)]);

        fs.add_file(run.join("fov-1-scan-1.json"), "content");
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.json"))
            .await
            .unwrap();

        assert!(s.fov_calls.is_empty());
        assert!(s.run_calls.is_empty());
    })
    .await
}

#[tokio::test]
async fn stalled_fov_is_logged_and_run_still_completes() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1), (2, 1)]);

        fs.add_file(run.join("fov-1-scan-1.json"), "content");
        fs.add_file(run.join("fov-1-scan-1.bin"), "content");
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.json"))
            .await
            .unwrap();
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.bin"))
            .await
            .unwrap();
        assert!(s.run_calls.is_empty());

        // fov-2's data file is preallocated but never written; the stall is
        // recovered and fov-2 drops out, leaving the run complete.
        fs.add_file(run.join("fov-2-scan-1.bin"), Vec::<u8>::new());
        s.dispatcher
            .on_file_created(&run.join("fov-2-scan-1.bin"))
            .await
            .unwrap();

        assert_eq!(s.fov_calls.entries(), vec!["fov-1-scan-1"]);
        assert_eq!(s.run_calls.len(), 1);

        let log = run_log_contents(&s, "run1");
        assert!(log.contains("never reached non-zero file size"));
        assert!(log.contains("All FOVs finished"));
    })
    .await
}

#[tokio::test]
async fn run_log_records_callbacks_in_list_order() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let (second_cb, _second_calls) = RecordingFovCallback::new("second_step");
        let mut s = session_with(&fs, run, &[(1, 1)], vec![Box::new(second_cb)]);

        fs.add_file(run.join("fov-1-scan-1.json"), "content");
        fs.add_file(run.join("fov-1-scan-1.bin"), "content");
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.json"))
            .await
            .unwrap();
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.bin"))
            .await
            .unwrap();

        let log = run_log_contents(&s, "run1");
        let first = log.find("Running record_fov on fov-1-scan-1").unwrap();
        let second = log.find("Running second_step on fov-1-scan-1").unwrap();
        assert!(first < second, "callbacks logged out of list order:\n{log}");
        assert!(log.contains("Extracting fov-1-scan-1"));
        assert!(log.contains("Running record_run on whole run"));
    })
    .await
}

#[tokio::test]
async fn failing_callback_is_fatal() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session_with(
            &fs,
            run,
            &[(1, 1)],
            vec![Box::new(FailingFovCallback::new("explode"))],
        );

        fs.add_file(run.join("fov-1-scan-1.json"), "content");
        fs.add_file(run.join("fov-1-scan-1.bin"), "content");
        s.dispatcher
            .on_file_created(&run.join("fov-1-scan-1.json"))
            .await
            .unwrap();
        let err = s
            .dispatcher
            .on_file_created(&run.join("fov-1-scan-1.bin"))
            .await
            .unwrap_err();

        assert!(matches!(err, FovWatchError::Callback { name, .. } if name == "explode"));
    })
    .await
}

#[tokio::test]
async fn unexpected_data_file_aborts_dispatch() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1)]);

        fs.add_file(run.join("fov-7-scan-1.bin"), "content");
        let err = s
            .dispatcher
            .on_file_created(&run.join("fov-7-scan-1.bin"))
            .await
            .unwrap_err();

        assert!(matches!(err, FovWatchError::UnexpectedDataFile { .. }));
        assert!(s.fov_calls.is_empty());
    })
    .await
}

#[tokio::test]
async fn replay_processes_files_already_on_disk() {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        let run = Path::new("/acq/run1");
        let mut s = session(&fs, run, &[(1, 1), (2, 1)]);

        // Everything arrived while nobody was watching.
        for name in [
            "fov-1-scan-1.json",
            "fov-1-scan-1.bin",
            "fov-2-scan-1.json",
            "fov-2-scan-1.bin",
        ] {
            fs.add_file(run.join(name), "content");
        }

        s.dispatcher.replay_existing().await.unwrap();

        let mut fovs = s.fov_calls.entries();
        fovs.sort();
        assert_eq!(fovs, fov_ids(&[(1, 1), (2, 1)]));
        assert_eq!(s.run_calls.len(), 1);
        assert!(s.dispatcher.snapshot().is_complete());
    })
    .await
}
