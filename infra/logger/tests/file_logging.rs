use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use trellis_domain::config::LoggingConfig;
use trellis_logger::Logger;

#[test]
fn file_logging_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        name: "integration-file".to_owned(),
        console: false,
        path: Some(log_dir.clone()),
        json: true,
        rotation: "never".to_owned(),
        ..LoggingConfig::default()
    };
    let logger = Logger::from_config(&config)?;
    assert!(logger.guard().is_some());

    tracing::info!(feature = "shop", "activated from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let content = fs::read_to_string(&log_file)?;
    let line = content.lines().find(|l| l.contains("activated from integration test"));
    let line = line.expect("message should be written");
    assert!(line.trim_start().starts_with('{'), "json line expected: {line}");
    assert!(line.contains("\"feature\":\"shop\""));

    Ok(())
}
