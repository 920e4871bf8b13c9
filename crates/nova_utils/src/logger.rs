use std::{
  fs::{File, OpenOptions},
  io::Write,
  path::PathBuf,
  sync::Mutex,
};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Which levels the [`Logger`] emits and where it writes them.
#[derive(Clone, Debug)]
pub struct LogConfig {
  pub enabled: bool,
  pub debug: bool,
  pub info: bool,
  pub warning: bool,
  pub error: bool,
  /// Append the source line and file to every message.
  pub location: bool,
  pub file_path: Option<PathBuf>,
  /// Truncate `file_path` on the first write instead of appending to it.
  pub erase_old_logs: bool,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      debug: true,
      info: true,
      warning: true,
      error: true,
      location: false,
      file_path: Some(PathBuf::from("log.txt")),
      erase_old_logs: true,
    }
  }
}

impl LogConfig {
  pub fn set_enabled(mut self, enabled: bool) -> Self {
    self.enabled = enabled;
    self
  }

  pub fn set_debug(mut self, debug: bool) -> Self {
    self.debug = debug;
    self
  }

  pub fn set_info(mut self, info: bool) -> Self {
    self.info = info;
    self
  }

  pub fn set_warning(mut self, warning: bool) -> Self {
    self.warning = warning;
    self
  }

  pub fn set_error(mut self, error: bool) -> Self {
    self.error = error;
    self
  }

  pub fn set_location(mut self, location: bool) -> Self {
    self.location = location;
    self
  }

  pub fn set_file_path(mut self, file_path: Option<PathBuf>) -> Self {
    self.file_path = file_path;
    self
  }

  pub fn set_erase_old_logs(mut self, erase_old_logs: bool) -> Self {
    self.erase_old_logs = erase_old_logs;
    self
  }

  pub fn level_enabled(&self, level: Level) -> bool {
    self.enabled
      && match level {
        Level::Error => self.error,
        Level::Warn => self.warning,
        Level::Info => self.info,
        Level::Debug | Level::Trace => self.debug,
      }
  }

  pub fn max_level(&self) -> LevelFilter {
    [
      (Level::Trace, LevelFilter::Trace),
      (Level::Info, LevelFilter::Info),
      (Level::Warn, LevelFilter::Warn),
      (Level::Error, LevelFilter::Error),
    ]
    .into_iter()
    .find(|(level, _)| self.level_enabled(*level))
    .map_or(LevelFilter::Off, |(_, filter)| filter)
  }

  /// Installs a [`Logger`] built from this config as the `log` backend.
  pub fn init(self) -> Result<(), SetLoggerError> {
    let max_level = self.max_level();
    log::set_boxed_logger(Box::new(Logger::new(self)))?;
    log::set_max_level(max_level);
    Ok(())
  }
}

struct FileSink {
  file: Option<File>,
  truncate: bool,
  failed: bool,
}

/// Leveled console logger that mirrors every message into an optional file.
///
/// File errors are reported once on stderr and otherwise ignored, logging never fails
/// the caller.
pub struct Logger {
  config: LogConfig,
  sink: Mutex<FileSink>,
}

impl Logger {
  pub fn new(config: LogConfig) -> Self {
    let sink = FileSink {
      file: None,
      truncate: config.erase_old_logs,
      failed: false,
    };

    Self {
      config,
      sink: Mutex::new(sink),
    }
  }

  pub fn config(&self) -> &LogConfig {
    &self.config
  }

  fn format(&self, record: &Record) -> String {
    let tag = match record.level() {
      Level::Error => "ERROR",
      Level::Warn => "WARNING",
      Level::Info => "INFO",
      Level::Debug => "DEBUG",
      Level::Trace => "TRACE",
    };

    match (self.config.location, record.line(), record.file()) {
      (true, Some(line), Some(file)) => {
        format!("[{}]: {} (line: {}, file: {})", tag, record.args(), line, file)
      }
      _ => format!("[{}]: {}", tag, record.args()),
    }
  }

  fn write_to_file(&self, message: &str) {
    let Some(path) = &self.config.file_path else {
      return;
    };
    let Ok(mut sink) = self.sink.lock() else {
      return;
    };
    if sink.failed {
      return;
    }

    if sink.file.is_none() {
      let opened = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(sink.truncate)
        .append(!sink.truncate)
        .open(path);

      match opened {
        Ok(file) => {
          sink.file = Some(file);
          sink.truncate = false;
        }
        Err(err) => {
          eprintln!("Failed to open log file {}: {}", path.display(), err);
          sink.failed = true;
          return;
        }
      }
    }

    if let Some(file) = sink.file.as_mut() {
      if let Err(err) = writeln!(file, "{}", message) {
        eprintln!("Failed to write to file {}: {}", path.display(), err);
        sink.failed = true;
      }
    }
  }
}

impl Log for Logger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    self.config.level_enabled(metadata.level())
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }

    let message = self.format(record);
    match record.level() {
      Level::Error | Level::Warn => eprintln!("{}", message),
      _ => println!("{}", message),
    }

    self.write_to_file(&message);
  }

  fn flush(&self) {
    if let Ok(mut sink) = self.sink.lock() {
      if let Some(file) = sink.file.as_mut() {
        let _ = file.flush();
      }
    }
  }
}

#[cfg(test)]
mod test {
  use std::{fs, path::PathBuf};

  use log::{Level, LevelFilter, Log, Record};

  use super::{LogConfig, Logger};

  fn temp_log(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("nova_logger_{}_{}.txt", std::process::id(), name));
    let _ = fs::remove_file(&path);
    path
  }

  fn emit(logger: &Logger, level: Level, message: &str) {
    logger.log(
      &Record::builder()
        .args(format_args!("{}", message))
        .level(level)
        .line(Some(7))
        .file(Some("world.rs"))
        .build(),
    );
  }

  #[test]
  fn level_filter() {
    let config = LogConfig::default().set_debug(false).set_file_path(None);

    assert!(!config.level_enabled(Level::Debug));
    assert!(!config.level_enabled(Level::Trace));
    assert!(config.level_enabled(Level::Info));
    assert_eq!(config.max_level(), LevelFilter::Info);

    let off = config.set_enabled(false);
    assert!(!off.level_enabled(Level::Error));
    assert_eq!(off.max_level(), LevelFilter::Off);
  }

  #[test]
  fn writes_formatted_messages() {
    let path = temp_log("format");
    let logger = Logger::new(LogConfig::default().set_file_path(Some(path.clone())));

    emit(&logger, Level::Debug, "Creating entity 0");
    emit(&logger, Level::Warn, "careful");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "[DEBUG]: Creating entity 0\n[WARNING]: careful\n");
    let _ = fs::remove_file(&path);
  }

  #[test]
  fn location_suffix() {
    let path = temp_log("location");
    let logger = Logger::new(
      LogConfig::default()
        .set_location(true)
        .set_file_path(Some(path.clone())),
    );

    emit(&logger, Level::Info, "hi");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "[INFO]: hi (line: 7, file: world.rs)\n");
    let _ = fs::remove_file(&path);
  }

  #[test]
  fn erase_old_logs_once() {
    let path = temp_log("erase");
    fs::write(&path, "old\n").unwrap();
    let logger = Logger::new(LogConfig::default().set_file_path(Some(path.clone())));

    emit(&logger, Level::Info, "first");
    emit(&logger, Level::Info, "second");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "[INFO]: first\n[INFO]: second\n");
    let _ = fs::remove_file(&path);
  }

  #[test]
  fn keeps_old_logs() {
    let path = temp_log("append");
    fs::write(&path, "old\n").unwrap();
    let logger = Logger::new(
      LogConfig::default()
        .set_erase_old_logs(false)
        .set_file_path(Some(path.clone())),
    );

    emit(&logger, Level::Error, "new");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "old\n[ERROR]: new\n");
    let _ = fs::remove_file(&path);
  }

  #[test]
  fn disabled_levels_are_not_written() {
    let path = temp_log("disabled");
    let logger = Logger::new(
      LogConfig::default()
        .set_debug(false)
        .set_file_path(Some(path.clone())),
    );

    emit(&logger, Level::Debug, "hidden");
    emit(&logger, Level::Info, "shown");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "[INFO]: shown\n");
    let _ = fs::remove_file(&path);
  }

  #[test]
  fn unwritable_file_is_ignored() {
    let path = std::env::temp_dir()
      .join("nova_missing_dir_for_logger")
      .join("nested")
      .join("log.txt");
    let logger = Logger::new(LogConfig::default().set_file_path(Some(path.clone())));

    emit(&logger, Level::Info, "still fine");
    emit(&logger, Level::Info, "still fine");

    assert!(!path.exists());
  }

  #[test]
  fn init_installs_backend() {
    LogConfig::default()
      .set_debug(false)
      .set_file_path(None)
      .init()
      .unwrap();

    assert_eq!(log::max_level(), LevelFilter::Info);
    assert!(LogConfig::default().init().is_err());
  }
}
