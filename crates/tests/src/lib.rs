//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> 分发器 -> sink 的端到端测试
//! - 并发分发的整行保证

#[cfg(test)]
mod contract_tests {
    use contracts::{RenderFlags, Severity, SinkConfig, TargetConfig};

    #[test]
    fn test_severity_order_is_stable() {
        let order: Vec<u8> = Severity::ALL.iter().map(|s| *s as u8).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(Severity::Error < Severity::Trace);
        assert_eq!("W".parse::<Severity>().unwrap(), Severity::Warning);
        assert!(Severity::try_from(5u8).is_err());
    }

    #[test]
    fn test_sink_config_json_snapshot() {
        let mut config = SinkConfig::new("mem", TargetConfig::Memory { capacity: Some(64) });
        config.flags = RenderFlags::NONE.with_timestamp();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["name"], "mem");
        assert_eq!(json["threshold"], "info");
        assert_eq!(json["flags"]["timestamp"], true);
        assert_eq!(json["flags"]["rich_text"], false);
        assert_eq!(json["target"]["kind"], "memory");
        assert_eq!(json["target"]["capacity"], 64);
        assert_eq!(json["caller_width"], 60);
        assert_eq!(json["timestamp"]["days"], 5);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{RenderFlags, Severity, SinkConfig, TargetConfig};
    use dispatcher::{
        create_dispatcher, log_warn, Dispatcher, DispatcherBuilder, DispatcherError,
        MemoryBuffer, Sink,
    };

    fn build(toml: &str) -> (Dispatcher, HashMap<String, MemoryBuffer>) {
        let config = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        DispatcherBuilder::new(config).build_with_buffers().unwrap()
    }

    /// End-to-end test: TOML -> ConfigLoader -> DispatcherBuilder -> memory sinks
    #[test]
    fn test_config_to_dispatch() {
        let (dispatcher, buffers) = build(
            r#"
[[sinks]]
name = "A"
threshold = "info"
target = { kind = "memory" }

[[sinks]]
name = "errors"
threshold = "error"
target = { kind = "memory" }
"#,
        );

        dispatcher.info("hello").unwrap();
        dispatcher.debug("hello").unwrap();
        dispatcher.error("boom").unwrap();

        assert_eq!(buffers["A"].contents(), "[I] hello\n[E] boom\n");
        assert_eq!(buffers["errors"].contents(), "[E] boom\n");

        let metrics: HashMap<_, _> = dispatcher.sink_metrics().into_iter().collect();
        assert_eq!(metrics["A"].written, 2);
        assert_eq!(metrics["A"].filtered, 1);
        assert_eq!(metrics["errors"].filtered, 2);
    }

    #[test]
    fn test_threshold_matrix() {
        let dispatcher = Dispatcher::new();
        let buffers: Vec<(Severity, MemoryBuffer)> = Severity::ALL
            .into_iter()
            .map(|threshold| {
                let (sink, buffer) = Sink::builder(threshold.as_str())
                    .threshold(threshold)
                    .memory(None)
                    .unwrap();
                dispatcher.add_sink(sink).unwrap();
                (threshold, buffer)
            })
            .collect();

        for severity in Severity::ALL {
            dispatcher.log(format!("{severity}"), severity).unwrap();
        }

        for (threshold, buffer) in buffers {
            let expected: Vec<String> = Severity::ALL
                .into_iter()
                .filter(|s| *s <= threshold)
                .map(|s| format!("[{}] {s}", s.letter()))
                .collect();
            assert_eq!(buffer.lines(), expected, "threshold {threshold}");
        }
    }

    #[test]
    fn test_timestamps_identical_across_sinks() {
        let (dispatcher, buffers) = build(
            r#"
[[sinks]]
name = "one"
target = { kind = "memory" }
flags = { timestamp = true }

[[sinks]]
name = "two"
target = { kind = "memory" }
flags = { timestamp = true }

[[sinks]]
name = "three"
target = { kind = "memory" }
flags = { timestamp = true }
"#,
        );

        thread::sleep(std::time::Duration::from_millis(5));
        dispatcher.info("tick").unwrap();

        let one = buffers["one"].contents();
        assert!(one.starts_with("[ "));
        assert!(one.ends_with(" ][I] tick\n"));
        assert_eq!(buffers["two"].contents(), one);
        assert_eq!(buffers["three"].contents(), one);
    }

    #[test]
    fn test_file_sink_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");
        let mut sink = SinkConfig::new(
            "file",
            TargetConfig::File {
                path: path.clone(),
                append: false,
                buffer_size: 64,
            },
        );
        sink.threshold = Severity::Warning;

        let dispatcher = create_dispatcher(vec![sink]).unwrap();
        for i in 0..20 {
            dispatcher.warning(format!("line {i}")).unwrap();
        }
        dispatcher.info("filtered").unwrap();
        dispatcher.close_all().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0], "[W] line 0");
        assert_eq!(lines[19], "[W] line 19");

        // closed sinks are gone; later dispatches are no-ops
        dispatcher.error("after close").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_concurrent_dispatch_whole_lines() {
        const THREADS: usize = 10;
        const PER_THREAD: usize = 10_000;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concurrent.log");
        let dispatcher = Arc::new(
            create_dispatcher(vec![
                SinkConfig::new("mem", TargetConfig::Memory { capacity: None }),
                SinkConfig::new(
                    "file",
                    TargetConfig::File {
                        path: path.clone(),
                        append: false,
                        buffer_size: 8192,
                    },
                ),
            ])
            .unwrap(),
        );
        let (sink, buffer) = Sink::builder("probe").memory(None).unwrap();
        dispatcher.add_sink(sink).unwrap();

        thread::scope(|scope| {
            for t in 0..THREADS {
                let dispatcher = Arc::clone(&dispatcher);
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        dispatcher.info(format!("t{t}-m{i}")).unwrap();
                    }
                });
            }
        });
        dispatcher.close_all().unwrap();

        let check = |text: &str| {
            let mut count = 0;
            for line in text.lines() {
                let (_, message) = line.split_once("][I] t").unwrap();
                assert!(message.contains("-m"), "{line}");
                count += 1;
            }
            assert_eq!(count, THREADS * PER_THREAD);
        };
        check(&buffer.contents());
        check(&std::fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn test_registry_errors_leave_state_unchanged() {
        let (dispatcher, buffers) = build(
            r#"
[[sinks]]
name = "A"
target = { kind = "memory" }
"#,
        );

        let (dup, _) = Sink::builder("A").memory(None).unwrap();
        assert!(matches!(
            dispatcher.add_sink(dup),
            Err(DispatcherError::DuplicateSink { .. })
        ));
        assert!(matches!(
            dispatcher.remove_sink("B"),
            Err(DispatcherError::SinkNotFound { .. })
        ));
        assert_eq!(dispatcher.list_sink_names(), vec!["A"]);

        dispatcher.info("still routed").unwrap();
        assert_eq!(buffers["A"].contents(), "[I] still routed\n");

        dispatcher.remove_sink("A").unwrap();
        dispatcher.info("nowhere").unwrap();
        assert_eq!(buffers["A"].contents(), "[I] still routed\n");
    }

    fn caller_sink(dispatcher: &Dispatcher) -> MemoryBuffer {
        let (sink, buffer) = Sink::builder("caller")
            .threshold(Severity::Debug)
            .flags(RenderFlags::NONE.with_caller_info())
            .caller_width(70)
            .memory(None)
            .unwrap();
        dispatcher.add_sink(sink).unwrap();
        buffer
    }

    #[test]
    fn test_macro_call_site_rendered() {
        let dispatcher = Dispatcher::new();
        let buffer = caller_sink(&dispatcher);

        log_warn!(dispatcher, "low disk: {}%", 3).unwrap();

        let line = buffer.contents();
        assert_eq!(line.chars().count(), 70 + "[W] low disk: 3%\n".len());
        assert!(
            line.contains("tests::e2e_tests.test_macro_call_site_rendered():"),
            "{line}"
        );
        assert!(line.ends_with(" ][W] low disk: 3%\n"), "{line}");
    }

    #[inline(never)]
    fn report_from_named_function(dispatcher: &Dispatcher) {
        dispatcher.info("walked").unwrap();
    }

    #[test]
    fn test_runtime_call_site_best_effort() {
        let dispatcher = Dispatcher::new();
        let buffer = caller_sink(&dispatcher);

        report_from_named_function(&dispatcher);

        let line = buffer.contents();
        assert!(line.ends_with(" ][I] walked\n"), "{line}");
        // Without debug symbols the walk falls back to the placeholder.
        assert!(
            line.contains("report_from_named_function():") || line.contains("?.?:?"),
            "{line}"
        );
    }

    #[test]
    fn test_exception_report() {
        let (dispatcher, buffers) = build(
            r#"
[[sinks]]
name = "errors"
threshold = "error"
target = { kind = "memory" }
"#,
        );

        let error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        dispatcher.log_exception(Some(&error)).unwrap();
        dispatcher.log_exception(None).unwrap();

        let text = buffers["errors"].contents();
        assert!(text.starts_with("[E] read-only volume\nat "));
        assert!(text.contains(&format!("[E] {}\nat ", dispatcher::NO_ERROR)));
    }
}

#[cfg(test)]
mod metrics_tests {
    use std::time::Instant;

    use contracts::{Severity, SinkConfig, TargetConfig};
    use dispatcher::create_dispatcher;
    use observability::{record_sink_metrics, DispatchAggregator};

    #[test]
    fn test_aggregate_dispatch_outcomes() {
        let mut sink = SinkConfig::new("warn", TargetConfig::Memory { capacity: Some(1024) });
        sink.threshold = Severity::Warning;
        let dispatcher = create_dispatcher(vec![sink]).unwrap();

        let mut aggregator = DispatchAggregator::new();
        for severity in Severity::ALL {
            let started = Instant::now();
            let result = dispatcher.log("probe", severity);
            aggregator.update(severity, result.is_ok(), started.elapsed());
        }
        for (name, snapshot) in dispatcher.sink_metrics() {
            record_sink_metrics(&name, &snapshot);
            assert_eq!(snapshot.written, 2);
            assert_eq!(snapshot.filtered, 3);
            assert_eq!(snapshot.total(), 5);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_events, 5);
        assert_eq!(summary.failed_events, 0);
        assert_eq!(summary.latency_us.count, 5);
    }
}
