use std::{
    fmt::Write as _,
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use chrono::{format::DelayedFormat, DateTime, Local};
use crossbeam_channel::{bounded, unbounded, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 日誌檔案所在的目錄
const LOG_DIR: &str = "log";

/// 累積多少字元後寫入一次檔案
const BATCH_SIZE: usize = 4096;

enum Command {
    Write(LogMessage),
    Flush(Sender<()>),
}

/// A named file logger.
///
/// Messages are handed to a background thread through a channel, so callers
/// never block on disk I/O. Each logger owns its own file
/// `log/<name>_<YYYY-MM-DD>.log`.
pub struct Logger {
    writer: Sender<Command>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<Command>();
        let log_path = Self::get_log_path(log_name);

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let mut writer = match log_path.and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
            }) {
                Some(file) => BufWriter::new(file),
                None => {
                    error_console("Failed to open log file, file logging disabled".to_string());
                    // 仍需回應 flush，避免呼叫端等待
                    for cmd in &rx {
                        if let Command::Flush(ack) = cmd {
                            let _ = ack.send(());
                        }
                    }
                    return;
                }
            };

            let mut line = String::with_capacity(BATCH_SIZE);

            for cmd in &rx {
                match cmd {
                    Command::Write(received) => {
                        if writeln!(
                            &mut line,
                            "{} {} {}",
                            received.created_at.format("%F %X%.6f"),
                            received.level,
                            received.msg
                        )
                        .is_err()
                        {
                            continue;
                        }

                        if rx.is_empty() || line.len() >= BATCH_SIZE {
                            write_batch(&mut writer, &mut line);
                        }
                    }
                    Command::Flush(ack) => {
                        write_batch(&mut writer, &mut line);
                        let _ = ack.send(());
                    }
                }
            }
        });

        Logger { writer: tx }
    }

    pub fn info(&self, log: String) {
        self.send(log::Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(log::Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(log::Level::Error, log);
    }

    pub fn debug(&self, log: String) {
        self.send(log::Level::Debug, log);
    }

    /// Blocks until every queued message has been written, or `timeout` elapses.
    pub fn flush(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        if self.writer.send(Command::Flush(ack_tx)).is_err() {
            return false;
        }

        ack_rx.recv_timeout(timeout).is_ok()
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(Command::Write(LogMessage::new(level, msg))) {
            error_console(why.to_string());
        }
    }

    fn get_log_path(name: &str) -> Option<PathBuf> {
        let path = Path::new(LOG_DIR);

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!("{}_{}.log", name, Local::now().format("%Y-%m-%d")));

        Some(log_path)
    }
}

fn write_batch(writer: &mut BufWriter<fs::File>, line: &mut String) {
    if line.is_empty() {
        return;
    }

    if writer.write_all(line.as_bytes()).is_err() || writer.flush().is_err() {
        info_console(line.clone());
    }

    line.clear();
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

/// Waits for the default logger to drain its queue.
pub fn flush(timeout: Duration) -> bool {
    LOGGER.flush(timeout)
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}
