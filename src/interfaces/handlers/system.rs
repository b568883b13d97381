use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::{sync::RwLock, time::Duration};
use sysinfo::System;

use crate::{constants::START_TIME, repositories::image::ImageRepository, AppState};

const CACHE_TTL_SECS: i64 = 5;

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ComponentStatus {
    Ok,
    Unavailable,
    NotConfigured,
}

#[derive(Serialize, Clone)]
struct Components {
    database: ComponentStatus,
    storage: ComponentStatus,
}

#[derive(Serialize, Clone)]
struct SearchSummary {
    min_score: i64,
    categories: Vec<String>,
    combinations: usize,
}

#[derive(Serialize, Clone)]
struct ProcessInfo {
    hostname: String,
    os: String,
    cpu_count: usize,
    memory_usage: String,
}

#[derive(Serialize, Clone)]
struct HealthReport {
    status: &'static str,
    version: &'static str,
    uptime: String,
    started_at: String,
    checked_at: DateTime<Utc>,
    components: Components,
    search: SearchSummary,
    process: ProcessInfo,
}

impl HealthReport {
    fn is_healthy(&self) -> bool {
        self.components.database == ComponentStatus::Ok
    }
}

static LAST_REPORT: Lazy<RwLock<Option<HealthReport>>> = Lazy::new(|| RwLock::new(None));

fn process_info() -> ProcessInfo {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu_all();

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| {
            sys.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
            sys.process(pid).map(|p| p.memory())
        })
        .map_or("Unknown".to_string(), |bytes| format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0));

    ProcessInfo {
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_usage,
    }
}

async fn build_report(state: &AppState) -> HealthReport {
    let library = &state.library_handler;
    let now = Utc::now();
    let uptime = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let database = match library.image_repo.check_connection().await {
        Ok(()) => ComponentStatus::Ok,
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            ComponentStatus::Unavailable
        }
    };
    let storage = if library.storage.is_configured() {
        ComponentStatus::Ok
    } else {
        ComponentStatus::NotConfigured
    };

    let vocabulary = library.scorer.vocabulary();
    let search = SearchSummary {
        min_score: library.scorer.min_score(),
        categories: vocabulary.categories.keys().cloned().collect(),
        combinations: vocabulary.combinations.len(),
    };

    let mut report = HealthReport {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        checked_at: now,
        components: Components { database, storage },
        search,
        process: process_info(),
    };
    if !report.is_healthy() {
        report.status = "degraded";
    }
    report
}

fn respond(report: HealthReport) -> HttpResponse {
    if report.is_healthy() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

/// Reports database reachability, storage configuration and the active
/// search tuning. Reports are reused for a few seconds.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let cached = match LAST_REPORT.read() {
        Ok(guard) => guard
            .as_ref()
            .filter(|r| (Utc::now() - r.checked_at).num_seconds() < CACHE_TTL_SECS)
            .cloned(),
        Err(e) => {
            tracing::warn!("Health report cache lock poisoned: {}", e);
            None
        }
    };

    if let Some(report) = cached {
        return respond(report);
    }

    let report = build_report(&state).await;
    if let Ok(mut guard) = LAST_REPORT.write() {
        *guard = Some(report.clone());
    }
    respond(report)
}
