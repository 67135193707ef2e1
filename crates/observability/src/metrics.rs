//! 日志分发指标收集模块
//!
//! 通过 `metrics` facade 发布 sink 计数与分发延迟，并在内存中聚合摘要。

use std::collections::BTreeMap;
use std::time::Duration;

use contracts::Severity;
use dispatcher::MetricsSnapshot;
use metrics::{counter, histogram};

/// 发布单个 sink 的计数快照
///
/// 计数为累计值，使用 `absolute` 覆盖。
pub fn record_sink_metrics(sink_name: &str, snapshot: &MetricsSnapshot) {
    counter!(
        "logdispatch_sink_written_total",
        "sink" => sink_name.to_string()
    )
    .absolute(snapshot.written);
    counter!(
        "logdispatch_sink_filtered_total",
        "sink" => sink_name.to_string()
    )
    .absolute(snapshot.filtered);
    counter!(
        "logdispatch_sink_failed_total",
        "sink" => sink_name.to_string()
    )
    .absolute(snapshot.failed);
}

/// 记录一次分发调用
pub fn record_dispatch(severity: Severity, success: bool, latency: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "logdispatch_events_dispatched_total",
        "severity" => severity.as_str(),
        "status" => status
    )
    .increment(1);
    histogram!("logdispatch_dispatch_latency_us").record(latency.as_secs_f64() * 1e6);
}

/// 分发指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DispatchAggregator {
    /// 总分发次数
    pub total_events: u64,

    /// 返回错误的分发次数
    pub failed_events: u64,

    /// 各严重级别的分发次数
    pub per_severity: BTreeMap<Severity, u64>,

    /// 分发延迟统计 (微秒)
    pub latency_stats: RunningStats,
}

impl DispatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次分发，同时发布到 metrics facade
    pub fn update(&mut self, severity: Severity, success: bool, latency: Duration) {
        self.total_events += 1;
        if !success {
            self.failed_events += 1;
        }
        *self.per_severity.entry(severity).or_insert(0) += 1;
        self.latency_stats.push(latency.as_secs_f64() * 1e6);
        record_dispatch(severity, success, latency);
    }

    /// 合并另一个聚合器 (多线程分发后汇总)
    pub fn merge(&mut self, other: &DispatchAggregator) {
        self.total_events += other.total_events;
        self.failed_events += other.failed_events;
        for (severity, count) in &other.per_severity {
            *self.per_severity.entry(*severity).or_insert(0) += count;
        }
        self.latency_stats.merge(&other.latency_stats);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            total_events: self.total_events,
            failed_events: self.failed_events,
            failure_rate: if self.total_events > 0 {
                self.failed_events as f64 / self.total_events as f64 * 100.0
            } else {
                0.0
            },
            per_severity: self.per_severity.clone(),
            latency_us: StatsSummary::from(&self.latency_stats),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub total_events: u64,
    pub failed_events: u64,
    pub failure_rate: f64,
    pub per_severity: BTreeMap<Severity, u64>,
    pub latency_us: StatsSummary,
}

impl std::fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Events: {}", self.total_events)?;
        writeln!(
            f,
            "Failed: {} ({:.2}%)",
            self.failed_events, self.failure_rate
        )?;
        for (severity, count) in &self.per_severity {
            writeln!(f, "  {severity}: {count}")?;
        }
        writeln!(f, "Latency (us): {}", self.latency_us)?;
        Ok(())
    }
}

/// 延迟分布摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        let (min, max) = stats.range.unwrap_or_default();
        Self {
            count: stats.count,
            min,
            max,
            mean: stats.mean,
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.count {
            0 => f.write_str("no samples"),
            n => write!(
                f,
                "n={n} mean={:.1} std={:.1} range=[{:.1}, {:.1}]",
                self.mean, self.std_dev, self.min, self.max
            ),
        }
    }
}

/// 单遍均值/方差累加器 (Welford)，可跨线程合并
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    /// 与均值之差的平方和
    m2: f64,
    range: Option<(f64, f64)>,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.range = Some(match self.range {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }

    /// 合并另一组样本，结果等同于顺序 push 全部样本
    pub fn merge(&mut self, other: &RunningStats) {
        let Some((other_lo, other_hi)) = other.range else {
            return;
        };
        let Some((lo, hi)) = self.range else {
            *self = other.clone();
            return;
        };
        let (n, m) = (self.count as f64, other.count as f64);
        let delta = other.mean - self.mean;
        self.m2 += other.m2 + delta * delta * n * m / (n + m);
        self.mean += delta * m / (n + m);
        self.count += other.count;
        self.range = Some((lo.min(other_lo), hi.max(other_hi)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 样本方差，少于两个样本时为 0
    pub fn variance(&self) -> f64 {
        match self.count {
            0 | 1 => 0.0,
            n => self.m2 / (n - 1) as f64,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值与最大值，无样本时为 `None`
    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }
}
