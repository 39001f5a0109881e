use rask_logger::domain::{Array, Object};
use rask_logger::logger::{FixedClock, MemorySink};
use rask_logger::{ErrorValue, Level, Logger, LoggerConfig, Value};

const TIME: &str = "2019-01-01T00:00:00.000Z";
const STACK: &str = "Error: Request timeout\n    at fetch (src/client.rs:42:9)\n    at main (src/main.rs:7:5)\n";

fn logger_with(config: LoggerConfig) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::new(config)
        .unwrap()
        .with_clock(FixedClock::parse(TIME).unwrap())
        .with_sink(sink.clone());
    (logger, sink)
}

fn logger() -> (Logger, MemorySink) {
    logger_with(LoggerConfig::default())
}

#[test]
fn test_info_without_data() {
    let (logger, sink) = logger();
    logger.log(Level::Info, "test", None);

    assert_eq!(
        sink.contents(),
        "{\"level\":\"INFO\",\"time\":\"2019-01-01T00:00:00.000Z\",\"message\":\"test\"}\n"
    );
}

#[test]
fn test_info_with_data() {
    let (logger, sink) = logger();
    logger.info("test", Some(&Value::object_from([("some", "data")])));

    assert_eq!(
        sink.contents(),
        "{\"level\":\"INFO\",\"time\":\"2019-01-01T00:00:00.000Z\",\"message\":\"test\",\"data\":{\"some\":\"data\"}}\n"
    );
}

#[test]
fn test_level_aliases_match_log() {
    let (logger, sink) = logger();
    logger.error("test", None);
    logger.log(Level::Error, "test", None);

    let writes = sink.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
    assert!(writes[0].starts_with("{\"level\":\"ERROR\""));
}

#[test]
fn test_below_threshold_emits_nothing() {
    let (logger, sink) = logger_with(LoggerConfig {
        level: "error".to_string(),
        ..LoggerConfig::default()
    });
    logger.info("test", None);
    logger.notice("test", Some(&Value::object_from([("n", 1)])));
    assert!(sink.is_empty());

    logger.alert("test", None);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_circular_data() {
    let fixture1 = Object::default();
    let fixture2 = Object::default();
    fixture2.insert("fixture1", fixture1.clone());
    fixture1.insert("fixture2", fixture2);

    let (logger, sink) = logger();
    logger.info("test", Some(&Value::from(fixture1)));

    assert!(
        sink.contents()
            .ends_with(",\"data\":{\"fixture2\":{\"fixture1\":\"[Circular]\"}}}\n")
    );
}

#[test]
fn test_exotic_values() {
    let (logger, sink) = logger();
    logger.info("buffer", Some(&Value::buffer(vec![0u8, 0])));
    logger.info("bigint", Some(&Value::big_int(999_999_999_999_999_999_999)));
    logger.info("map", Some(&Value::map_from([("test", "map")])));
    logger.info("set", Some(&Value::set_from(["test", "test"])));

    let writes = sink.writes();
    assert!(writes[0].ends_with(",\"data\":{\"type\":\"Buffer\",\"data\":[0,0]}}\n"));
    assert!(writes[1].ends_with(",\"data\":\"999999999999999999999\"}\n"));
    assert!(writes[2].ends_with(",\"data\":[[\"test\",\"map\"]]}\n"));
    assert!(writes[3].ends_with(",\"data\":[\"test\"]}\n"));
}

#[test]
fn test_top_level_error() {
    let err = ErrorValue::new("Request timeout")
        .with_property("serviceName", "test")
        .with_stack(STACK);

    let (logger, sink) = logger();
    logger.error("request failed", Some(&Value::from(err)));

    assert_eq!(
        sink.contents(),
        concat!(
            "{\"level\":\"ERROR\",\"time\":\"2019-01-01T00:00:00.000Z\",\"message\":\"request failed\",",
            "\"data\":{\"name\":\"Error\",\"message\":\"Request timeout\",\"serviceName\":\"test\",",
            "\"stack\":[\"at fetch (src/client.rs:42:9)\",\"at main (src/main.rs:7:5)\"]}}\n"
        )
    );
}

#[test]
fn test_nested_error_with_captured_stack() {
    let (logger, sink) = logger();
    let data = Value::object_from([("err", Value::from(ErrorValue::new("Request timeout")))]);
    logger.warn("retrying", Some(&data));

    let line: serde_json::Value = serde_json::from_str(sink.contents().trim_end()).unwrap();
    let err = &line["data"]["err"];
    assert_eq!(err["name"], "Error");
    assert_eq!(err["message"], "Request timeout");

    let stack = err["stack"].as_array().unwrap();
    assert!(stack.iter().all(serde_json::Value::is_string));
}

#[test]
fn test_error_cycle_through_property() {
    let err = ErrorValue::new("loop").without_stack();
    err.set_property("self", err.clone());

    let (logger, sink) = logger();
    logger.crit("test", Some(&Value::from(err)));

    assert!(sink.contents().ends_with(
        ",\"data\":{\"name\":\"Error\",\"message\":\"loop\",\"self\":\"[Circular]\",\"stack\":[]}}\n"
    ));
}

#[test]
fn test_shared_array_in_siblings() {
    let shared = Array::default();
    shared.push("x");
    let data = Value::array_from([Value::from(shared.clone()), Value::from(shared)]);

    let (logger, sink) = logger();
    logger.debug("test", Some(&data));
    assert!(sink.contents().ends_with(",\"data\":[[\"x\"],[\"x\"]]}\n"));
}

#[test]
fn test_undefined_data_omits_key() {
    let (logger, sink) = logger();
    logger.info("test", Some(&Value::Undefined));
    assert_eq!(
        sink.contents(),
        "{\"level\":\"INFO\",\"time\":\"2019-01-01T00:00:00.000Z\",\"message\":\"test\"}\n"
    );
}

#[test]
fn test_logger_shared_across_threads() {
    let (logger, sink) = logger();
    let logger = std::sync::Arc::new(logger);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = std::sync::Arc::clone(&logger);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    logger.info(&format!("thread {i}"), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let writes = sink.writes();
    assert_eq!(writes.len(), 100);
    assert!(writes.iter().all(|line| {
        line.ends_with("\"}\n") && serde_json::from_str::<serde_json::Value>(line).is_ok()
    }));
}
