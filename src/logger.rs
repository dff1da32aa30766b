use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
    // 同时输出到 stderr，方便容器里直接看日志
    mirror_stderr: bool,
}

impl Logger {
    pub fn new(log_path: &Path, level: LevelFilter, mirror_stderr: bool) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Logger {
            file: Mutex::new(file),
            level,
            mirror_stderr,
        })
    }

    pub fn init(log_path: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        let logger = Self::new(log_path, level, true)?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "[{}] [{}] [{}:{}] {}\n",
            timestamp,
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = Self::format(record);
        // 写日志失败不能影响业务流程
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(log_entry.as_bytes());
        }
        if self.mirror_stderr {
            let _ = std::io::stderr().write_all(log_entry.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::fs;

    fn temp_log_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("storefront-{}.log", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_writes_enabled_records() {
        let path = temp_log_path();
        let logger = Logger::new(&path, LevelFilter::Info, false).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .file(Some("auth/guard.rs"))
                .line(Some(42))
                .args(format_args!("用户 a@b.c 登录失败"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("不应写入"))
                .build(),
        );
        logger.flush();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[WARN] [auth/guard.rs:42] 用户 a@b.c 登录失败"));
        assert!(!content.contains("不应写入"));

        let _ = fs::remove_file(&path);
    }
}
