//! Integration tests for job orchestration

#[cfg(test)]
mod tests {
    use anvil_builder::Job;
    use anvil_config::{BuildConfig, Layer};
    use anvil_events::{channel, AppEvent, BuildEvent, EventReceiver};
    use anvil_toolchain::{lookup, Toolchain, GNULIKE_FLAGS};
    use filetime::FileTime;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn config_layer() -> Layer {
        Layer {
            src: Some(PathBuf::from("src")),
            bin: Some(PathBuf::from("bin")),
            obj: Some(PathBuf::from("bin/obj")),
            cc: Some("gcc".to_string()),
            exe: Some("app".to_string()),
            dry_run: true,
            ..Layer::default()
        }
    }

    fn project_config(project: &Path) -> BuildConfig {
        BuildConfig::resolve(project, config_layer()).unwrap()
    }

    fn write_source(project: &Path, relative: &str) -> PathBuf {
        let path = project.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "int stub(void) { return 0; }\n").unwrap();
        path
    }

    fn drain_build_events(mut rx: EventReceiver) -> Vec<BuildEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Build(build) = event {
                events.push(build);
            }
        }
        events
    }

    #[tokio::test]
    async fn test_discovery_filters_by_extension() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/main.cpp");
        write_source(dir.path(), "src/log.c");
        write_source(dir.path(), "src/nested/util.c");
        write_source(dir.path(), "src/readme.md");
        write_source(dir.path(), "src/header.h");

        let (tx, _rx) = channel();
        let mut job =
            Job::new(project_config(dir.path()), *lookup("gcc").unwrap()).with_event_sender(tx);
        job.act().await.unwrap();

        assert_eq!(job.sources().len(), 3);
        for source in job.sources() {
            let ext = source.extension().unwrap().to_str().unwrap();
            assert!(ext == "c" || ext == "cpp", "discovered {}", source.display());
        }
    }

    #[tokio::test]
    async fn test_objects_track_sources_in_discovery_order() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/main.cpp");
        write_source(dir.path(), "src/log.c");

        let (tx, rx) = channel();
        let mut job =
            Job::new(project_config(dir.path()), *lookup("gcc").unwrap()).with_event_sender(tx);
        job.act().await.unwrap();

        assert_eq!(job.objects().len(), job.sources().len());
        for (source, object) in job.sources().iter().zip(job.objects()) {
            assert_eq!(source.file_stem(), object.file_stem());
            assert_eq!(object.extension().unwrap(), "o");
            assert!(object.starts_with(dir.path().join("bin/obj")));
        }

        // The link command lists the objects in compile order
        let events = drain_build_events(rx);
        let link_command = events
            .iter()
            .filter_map(|e| match e {
                BuildEvent::CommandEmitted { command } => Some(command.clone()),
                _ => None,
            })
            .last()
            .expect("link command must be emitted");
        let mut last_at = 0;
        for object in job.objects() {
            let name = object.file_name().unwrap().to_str().unwrap();
            let at = link_command.find(name).expect("object missing from link");
            assert!(at >= last_at, "link order diverged from compile order");
            last_at = at;
        }
    }

    #[tokio::test]
    async fn test_directories_are_created() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/main.c");

        let (tx, _rx) = channel();
        let mut job =
            Job::new(project_config(dir.path()), *lookup("gcc").unwrap()).with_event_sender(tx);
        job.act().await.unwrap();

        assert!(dir.path().join("bin").is_dir());
        assert!(dir.path().join("bin/obj").is_dir());
    }

    #[tokio::test]
    async fn test_up_to_date_source_is_not_recompiled() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), "src/a.c");
        let object = dir.path().join("bin/obj/a.o");
        std::fs::create_dir_all(object.parent().unwrap()).unwrap();
        std::fs::write(&object, "stale").unwrap();
        filetime::set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();
        filetime::set_file_mtime(&object, FileTime::from_unix_time(2_000, 0)).unwrap();

        let (tx, rx) = channel();
        let mut job =
            Job::new(project_config(dir.path()), *lookup("gcc").unwrap()).with_event_sender(tx);
        job.act().await.unwrap();

        let events = drain_build_events(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, BuildEvent::CompileSkipped { object } if object == "a.o")));
        assert!(!events
            .iter()
            .any(|e| matches!(e, BuildEvent::CompileStarted { .. })));
        // Linking still happens
        assert!(events
            .iter()
            .any(|e| matches!(e, BuildEvent::LinkStarted { .. })));
    }

    #[tokio::test]
    async fn test_clean_build_removes_stale_objects_of_active_toolchain() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), "src/a.c");
        let obj_dir = dir.path().join("bin/obj");
        std::fs::create_dir_all(&obj_dir).unwrap();
        std::fs::write(obj_dir.join("old.o"), "stale").unwrap();
        std::fs::write(obj_dir.join("a.o"), "stale").unwrap();
        std::fs::write(obj_dir.join("foreign.obj"), "msvc leftover").unwrap();
        // Even a fresh object must not survive a clean build
        filetime::set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();
        filetime::set_file_mtime(obj_dir.join("a.o"), FileTime::from_unix_time(2_000, 0)).unwrap();

        let layer = Layer {
            clean: true,
            ..Layer::default()
        };
        let config = BuildConfig::resolve(dir.path(), layer.merge(config_layer()))
            .unwrap();

        let (tx, rx) = channel();
        let mut job = Job::new(config, *lookup("gcc").unwrap()).with_event_sender(tx);
        job.act().await.unwrap();

        assert!(!obj_dir.join("old.o").exists());
        assert!(!obj_dir.join("a.o").exists());
        // Different toolchain's extension is left untouched
        assert!(obj_dir.join("foreign.obj").exists());

        let events = drain_build_events(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, BuildEvent::CleanStarted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, BuildEvent::CompileStarted { object } if object == "a.o")));
    }

    static FAILING: Toolchain = Toolchain {
        name: "gcc",
        command: "false",
        flags: GNULIKE_FLAGS,
    };

    #[cfg(unix)]
    #[tokio::test]
    async fn test_first_compile_failure_aborts_the_pipeline() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/a.c");
        write_source(dir.path(), "src/b.cpp");

        let layer = Layer {
            dry_run: false,
            ..config_layer()
        };
        let config = BuildConfig::resolve(dir.path(), layer).unwrap();

        let (tx, rx) = channel();
        let mut job = Job::new(config, FAILING).with_event_sender(tx);
        assert!(job.act().await.is_err());

        assert_eq!(job.sources().len(), 2);
        assert!(job.objects().len() < job.sources().len());

        let events = drain_build_events(rx);
        let compiles = events
            .iter()
            .filter(|e| matches!(e, BuildEvent::CompileStarted { .. }))
            .count();
        assert_eq!(compiles, 1, "second source must never be attempted");
        assert!(!events
            .iter()
            .any(|e| matches!(e, BuildEvent::LinkStarted { .. })));
    }
}
