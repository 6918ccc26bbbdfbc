use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 操作開始時的取樣點，交給 `SystemMonitor::finish` 結算
#[derive(Debug, Clone, Copy)]
pub struct OperationSample {
    pub operation: &'static str,
    started: Instant,
    memory_mb: Option<u64>,
}

/// 單次操作的資源使用
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStats {
    pub operation: &'static str,
    pub elapsed: Duration,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    /// 相對於操作開始時的記憶體變化
    pub memory_delta_mb: i64,
    pub peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    peak_memory_mb: AtomicU64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            peak_memory_mb: AtomicU64::new(0),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 讀取本行程目前的 CPU 與記憶體 (MB)
    fn read_process(&self) -> Option<(f32, u64)> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed);
        Some((process.cpu_usage(), memory_mb))
    }

    pub fn start(&self, operation: &'static str) -> OperationSample {
        let memory_mb = if self.enabled {
            self.read_process().map(|(_, memory)| memory)
        } else {
            None
        };

        OperationSample {
            operation,
            started: Instant::now(),
            memory_mb,
        }
    }

    /// 結算一次操作；未啟用或讀不到行程資訊時回傳 None
    pub fn finish(&self, sample: OperationSample) -> Option<OperationStats> {
        if !self.enabled {
            return None;
        }

        let elapsed = sample.started.elapsed();
        let (cpu_usage, memory_mb) = self.read_process()?;
        let memory_delta_mb = sample
            .memory_mb
            .map(|before| memory_mb as i64 - before as i64)
            .unwrap_or(0);

        Some(OperationStats {
            operation: sample.operation,
            elapsed,
            cpu_usage,
            memory_mb,
            memory_delta_mb,
            peak_memory_mb: self.peak_memory_mb.load(Ordering::Relaxed),
        })
    }

    pub fn log_operation(&self, sample: OperationSample) {
        if let Some(stats) = self.finish(sample) {
            tracing::info!(
                "📊 {} - Time: {:?}, CPU: {:.1}%, Memory: {}MB ({:+}MB), Peak: {}MB",
                stats.operation,
                stats.elapsed,
                stats.cpu_usage,
                stats.memory_mb,
                stats.memory_delta_mb,
                stats.peak_memory_mb
            );
        }
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn start(&self, operation: &'static str) -> OperationSample {
        OperationSample {
            operation,
            started: Instant::now(),
            memory_mb: None,
        }
    }

    pub fn finish(&self, _sample: OperationSample) -> Option<OperationStats> {
        None
    }

    pub fn log_operation(&self, _sample: OperationSample) {}
}
