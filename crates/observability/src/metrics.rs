//! 阶段指标模块
//!
//! 记录每个阶段的启动次数、结果与耗时。未安装 recorder 时全部为空操作。

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// 阶段启动次数
pub const STAGE_STARTS_TOTAL: &str = "bench_runner_stage_starts_total";
/// 阶段结束次数 (按 status 区分)
pub const STAGE_RUNS_TOTAL: &str = "bench_runner_stage_runs_total";
/// 阶段耗时 (秒)
pub const STAGE_DURATION_SECONDS: &str = "bench_runner_stage_duration_seconds";
/// 当前正在运行的阶段数
pub const STAGE_ACTIVE: &str = "bench_runner_stage_active";
/// 运行结束次数 (按 status 区分)
pub const RUNS_TOTAL: &str = "bench_runner_runs_total";

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// 记录阶段启动
pub fn record_stage_started(stage: &str) {
    counter!(STAGE_STARTS_TOTAL, "stage" => stage.to_string()).increment(1);
    gauge!(STAGE_ACTIVE, "stage" => stage.to_string()).set(1.0);
}

/// 记录阶段结束
pub fn record_stage_finished(stage: &str, elapsed: Duration, success: bool) {
    counter!(
        STAGE_RUNS_TOTAL,
        "stage" => stage.to_string(),
        "status" => status_label(success)
    )
    .increment(1);
    histogram!(STAGE_DURATION_SECONDS, "stage" => stage.to_string()).record(elapsed.as_secs_f64());
    gauge!(STAGE_ACTIVE, "stage" => stage.to_string()).set(0.0);
}

/// 记录整次运行结束
pub fn record_run_finished(success: bool) {
    counter!(RUNS_TOTAL, "status" => status_label(success)).increment(1);
}
